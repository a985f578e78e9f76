use chrono::{DateTime, TimeDelta, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::{ParticipantKind, Tournament, TournamentStatus};
use crate::services::fixtures::FixtureFormat;

/// Tournament as served by the API, with its clock-derived status.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TournamentResponse {
    pub tournament_id: Uuid,
    pub name: String,
    pub sport: String,
    pub organizer_id: Uuid,
    pub description: Option<String>,
    pub banner_url: Option<String>,
    pub registration_type: ParticipantKind,
    pub registration_start: DateTime<Utc>,
    pub registration_end: DateTime<Utc>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_cancelled: bool,
    pub entry_fee: Decimal,
    pub max_participants: Option<i32>,
    pub status: TournamentStatus,
    pub registration_open: bool,
    pub registered_count: usize,
    pub approved_count: usize,
    pub created_at: DateTime<Utc>,
}

impl TournamentResponse {
    pub fn new(tournament: Tournament, now: DateTime<Utc>) -> Self {
        let roster = tournament.roster();
        Self {
            status: tournament.derived_status(now),
            registration_open: tournament.registration_open(now),
            registered_count: roster.registered().len(),
            approved_count: roster.approved().len(),
            tournament_id: tournament.tournament_id,
            name: tournament.name,
            sport: tournament.sport,
            organizer_id: tournament.organizer_id,
            description: tournament.description,
            banner_url: tournament.banner_url,
            registration_type: tournament.registration_type,
            registration_start: tournament.registration_start,
            registration_end: tournament.registration_end,
            start_date: tournament.start_date,
            end_date: tournament.end_date,
            is_cancelled: tournament.is_cancelled,
            entry_fee: tournament.entry_fee,
            max_participants: tournament.max_participants,
            created_at: tournament.created_at,
        }
    }
}

/// Request payload for creating a tournament. The caller becomes its organizer.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateTournamentRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,

    #[validate(length(min = 1, max = 100))]
    pub sport: String,

    #[validate(length(max = 5000))]
    pub description: Option<String>,

    #[validate(url(message = "Banner must be a valid URL"))]
    pub banner_url: Option<String>,

    pub registration_type: ParticipantKind,

    pub registration_start: DateTime<Utc>,

    pub registration_end: DateTime<Utc>,

    pub start_date: DateTime<Utc>,

    pub end_date: DateTime<Utc>,

    #[serde(default)]
    pub entry_fee: Decimal,

    #[validate(range(min = 2, message = "A tournament needs room for at least 2 participants"))]
    pub max_participants: Option<i32>,
}

impl CreateTournamentRequest {
    /// Checks that span several fields
    pub fn validate_schedule(&self) -> Result<(), &'static str> {
        check_schedule(
            self.registration_start,
            self.registration_end,
            self.start_date,
            self.end_date,
        )?;
        if self.entry_fee < Decimal::ZERO {
            return Err("Entry fee cannot be negative");
        }
        Ok(())
    }
}

fn check_schedule(
    registration_start: DateTime<Utc>,
    registration_end: DateTime<Utc>,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
) -> Result<(), &'static str> {
    if registration_end < registration_start {
        return Err("Registration end must be on or after registration start");
    }
    if end_date < start_date {
        return Err("End date must be on or after start date");
    }
    if registration_end > end_date {
        return Err("Registration must close before the tournament ends");
    }
    Ok(())
}

/// Request payload for updating a tournament. Omitted fields stay unchanged;
/// the registration type is fixed once created.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateTournamentRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub sport: Option<String>,

    #[validate(length(max = 5000))]
    pub description: Option<String>,

    #[validate(url)]
    pub banner_url: Option<String>,

    pub registration_start: Option<DateTime<Utc>>,

    pub registration_end: Option<DateTime<Utc>>,

    pub start_date: Option<DateTime<Utc>>,

    pub end_date: Option<DateTime<Utc>>,

    pub entry_fee: Option<Decimal>,

    #[validate(range(min = 2))]
    pub max_participants: Option<i32>,
}

impl UpdateTournamentRequest {
    /// Applies the update to `existing` and validates the merged schedule.
    pub fn merge_into(&self, existing: &Tournament) -> Result<Tournament, &'static str> {
        let mut merged = existing.clone();
        if let Some(name) = &self.name {
            merged.name = name.clone();
        }
        if let Some(sport) = &self.sport {
            merged.sport = sport.clone();
        }
        if self.description.is_some() {
            merged.description = self.description.clone();
        }
        if self.banner_url.is_some() {
            merged.banner_url = self.banner_url.clone();
        }
        merged.registration_start = self.registration_start.unwrap_or(merged.registration_start);
        merged.registration_end = self.registration_end.unwrap_or(merged.registration_end);
        merged.start_date = self.start_date.unwrap_or(merged.start_date);
        merged.end_date = self.end_date.unwrap_or(merged.end_date);
        merged.entry_fee = self.entry_fee.unwrap_or(merged.entry_fee);
        if self.max_participants.is_some() {
            merged.max_participants = self.max_participants;
        }

        check_schedule(
            merged.registration_start,
            merged.registration_end,
            merged.start_date,
            merged.end_date,
        )?;
        if merged.entry_fee < Decimal::ZERO {
            return Err("Entry fee cannot be negative");
        }
        if let Some(max) = merged.capacity()
            && merged.roster().registered().len() > max
        {
            return Err("Capacity cannot drop below the number of registered participants");
        }
        Ok(merged)
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct TournamentFilter {
    pub sport: Option<String>,
    pub organizer_id: Option<Uuid>,
    pub registration_type: Option<ParticipantKind>,
    /// Filter on the derived status
    pub status: Option<TournamentStatus>,
}

/// Body for registering, withdrawing or booking. `team_id` is required for
/// team tournaments and must be absent for player tournaments.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct RegistrationRequest {
    pub team_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ParticipantsResponse {
    pub tournament_id: Uuid,
    pub registration_type: ParticipantKind,
    pub registered: Vec<Uuid>,
    pub approved: Vec<Uuid>,
    pub pending: Vec<Uuid>,
}

impl From<&Tournament> for ParticipantsResponse {
    fn from(tournament: &Tournament) -> Self {
        let roster = tournament.roster();
        Self {
            tournament_id: tournament.tournament_id,
            registration_type: tournament.registration_type,
            pending: roster.pending(),
            registered: roster.registered().to_vec(),
            approved: roster.approved().to_vec(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct GenerateFixturesRequest {
    #[serde(default)]
    pub format: FixtureFormat,

    /// Kick-off of the first fixture; defaults to the tournament start
    pub first_match_at: Option<DateTime<Utc>>,

    #[serde(default = "default_interval_minutes")]
    #[validate(range(min = 1, max = 10080))]
    pub interval_minutes: i64,

    #[validate(length(max = 255))]
    pub venue: Option<String>,
}

fn default_interval_minutes() -> i64 {
    180
}

impl GenerateFixturesRequest {
    pub fn interval(&self) -> TimeDelta {
        TimeDelta::minutes(self.interval_minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateTournamentRequest {
        let start = Utc::now() + TimeDelta::days(10);
        CreateTournamentRequest {
            name: "City League".to_string(),
            sport: "football".to_string(),
            description: None,
            banner_url: None,
            registration_type: ParticipantKind::Team,
            registration_start: Utc::now(),
            registration_end: start - TimeDelta::days(1),
            start_date: start,
            end_date: start + TimeDelta::days(3),
            entry_fee: Decimal::ZERO,
            max_participants: Some(8),
        }
    }

    #[test]
    fn test_valid_schedule() {
        let req = request();
        assert!(req.validate().is_ok());
        assert!(req.validate_schedule().is_ok());
    }

    #[test]
    fn test_end_before_start_rejected() {
        let mut req = request();
        req.end_date = req.start_date - TimeDelta::hours(1);
        assert_eq!(
            req.validate_schedule(),
            Err("End date must be on or after start date")
        );
    }

    #[test]
    fn test_negative_fee_rejected() {
        let mut req = request();
        req.entry_fee = Decimal::new(-100, 2);
        assert!(req.validate_schedule().is_err());
    }

    #[test]
    fn test_capacity_of_one_fails_validation() {
        let mut req = request();
        req.max_participants = Some(1);
        assert!(req.validate().is_err());
    }

    fn stored(max_participants: Option<i32>, registered: usize) -> Tournament {
        let req = request();
        Tournament {
            tournament_id: Uuid::new_v4(),
            name: req.name,
            sport: req.sport,
            organizer_id: Uuid::new_v4(),
            description: None,
            banner_url: None,
            registration_type: req.registration_type,
            registration_start: req.registration_start,
            registration_end: req.registration_end,
            start_date: req.start_date,
            end_date: req.end_date,
            is_cancelled: false,
            entry_fee: Decimal::ZERO,
            max_participants,
            registered_teams: (0..registered).map(|_| Uuid::new_v4()).collect(),
            approved_teams: Vec::new(),
            registered_players: Vec::new(),
            approved_players: Vec::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_capacity_cannot_drop_below_registrations() {
        let existing = stored(Some(8), 4);
        let shrink = UpdateTournamentRequest {
            max_participants: Some(3),
            ..Default::default()
        };
        assert!(shrink.merge_into(&existing).is_err());

        let fits = UpdateTournamentRequest {
            max_participants: Some(4),
            ..Default::default()
        };
        assert_eq!(fits.merge_into(&existing).unwrap().max_participants, Some(4));
    }

    #[test]
    fn test_merge_keeps_roster_and_unchanged_fields() {
        let existing = stored(None, 2);
        let rename = UpdateTournamentRequest {
            name: Some("County League".to_string()),
            ..Default::default()
        };
        let merged = rename.merge_into(&existing).unwrap();
        assert_eq!(merged.name, "County League");
        assert_eq!(merged.sport, existing.sport);
        assert_eq!(merged.registered_teams, existing.registered_teams);
    }

    #[test]
    fn test_fixture_request_defaults() {
        let req: GenerateFixturesRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.format, FixtureFormat::RoundRobin);
        assert_eq!(req.interval(), TimeDelta::hours(3));
        assert!(req.validate().is_ok());
    }
}
