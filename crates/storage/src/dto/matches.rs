use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::error::DomainError;
use crate::models::{Match, MatchStatus, ParticipantKind};
use crate::services::match_state;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MatchResponse {
    pub match_id: Uuid,
    pub tournament_id: Option<Uuid>,
    pub participant_kind: ParticipantKind,
    pub participant_a: Uuid,
    pub participant_b: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub venue: Option<String>,
    pub round: i32,
    pub is_cancelled: bool,
    /// Status as recorded by the organizer
    pub status: MatchStatus,
    /// Status computed from the kick-off time and the fixed match duration
    pub derived_status: MatchStatus,
    pub score_a: Option<i32>,
    pub score_b: Option<i32>,
    pub winner: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl MatchResponse {
    pub fn new(game: Match, now: DateTime<Utc>) -> Self {
        Self {
            derived_status: game.derived_status(now),
            match_id: game.match_id,
            tournament_id: game.tournament_id,
            participant_kind: game.participant_kind,
            participant_a: game.participant_a,
            participant_b: game.participant_b,
            scheduled_at: game.scheduled_at,
            venue: game.venue,
            round: game.round,
            is_cancelled: game.is_cancelled,
            status: game.status,
            score_a: game.score_a,
            score_b: game.score_b,
            winner: game.winner,
            created_at: game.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_distinct_participants"))]
pub struct CreateMatchRequest {
    pub tournament_id: Option<Uuid>,

    pub participant_kind: ParticipantKind,

    pub participant_a: Uuid,

    pub participant_b: Uuid,

    pub scheduled_at: DateTime<Utc>,

    #[validate(length(max = 255))]
    pub venue: Option<String>,

    #[serde(default = "default_round")]
    #[validate(range(min = 1))]
    pub round: i32,
}

fn default_round() -> i32 {
    1
}

fn validate_distinct_participants(req: &CreateMatchRequest) -> Result<(), ValidationError> {
    if req.participant_a == req.participant_b {
        let mut err = ValidationError::new("same_participant");
        err.message = Some("A match needs two different participants".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateMatchRequest {
    pub scheduled_at: Option<DateTime<Utc>>,

    #[validate(length(max = 255))]
    pub venue: Option<String>,

    #[validate(range(min = 1))]
    pub round: Option<i32>,
}

impl UpdateMatchRequest {
    /// Applies the changed fields to `existing`. Status is left alone, it
    /// only moves through cancellation or a recorded result.
    pub fn merge_into(&self, existing: &Match) -> Result<Match, DomainError> {
        match_state::ensure_editable(existing)?;

        let mut merged = existing.clone();
        if let Some(scheduled_at) = self.scheduled_at {
            merged.scheduled_at = scheduled_at;
        }
        if let Some(venue) = &self.venue {
            merged.venue = Some(venue.clone());
        }
        if let Some(round) = self.round {
            merged.round = round;
        }
        Ok(merged)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct MatchResultRequest {
    #[validate(range(min = 0))]
    pub score_a: i32,

    #[validate(range(min = 0))]
    pub score_b: i32,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct MatchFilter {
    pub tournament_id: Option<Uuid>,
    /// Matches where this team or player takes part
    pub participant_id: Option<Uuid>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_participant_rejected() {
        let id = Uuid::new_v4();
        let req = CreateMatchRequest {
            tournament_id: None,
            participant_kind: ParticipantKind::Player,
            participant_a: id,
            participant_b: id,
            scheduled_at: Utc::now(),
            venue: None,
            round: 1,
        };
        assert!(req.validate().is_err());
    }

    fn game(status: MatchStatus, is_cancelled: bool) -> Match {
        Match {
            match_id: Uuid::new_v4(),
            tournament_id: None,
            participant_kind: ParticipantKind::Player,
            participant_a: Uuid::new_v4(),
            participant_b: Uuid::new_v4(),
            scheduled_at: Utc::now() - chrono::TimeDelta::hours(1),
            venue: Some("Ground 1".to_string()),
            round: 1,
            is_cancelled,
            status,
            score_a: None,
            score_b: None,
            winner: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_status_in_update_body_is_ignored() {
        let req: UpdateMatchRequest =
            serde_json::from_str(r#"{"status":"CANCELLED","venue":"Ground 2"}"#).unwrap();
        let existing = game(MatchStatus::Scheduled, false);

        let merged = req.merge_into(&existing).unwrap();
        assert_eq!(merged.status, MatchStatus::Scheduled);
        assert!(!merged.is_cancelled);
        assert_eq!(merged.venue.as_deref(), Some("Ground 2"));
        assert_eq!(merged.scheduled_at, existing.scheduled_at);
    }

    #[test]
    fn test_completed_match_cannot_be_updated() {
        let mut finished = game(MatchStatus::Completed, false);
        finished.score_a = Some(3);
        finished.score_b = Some(1);
        let req = UpdateMatchRequest {
            round: Some(2),
            ..Default::default()
        };
        assert_eq!(req.merge_into(&finished).unwrap_err(), DomainError::MatchCompleted);
    }

    #[test]
    fn test_cancelled_match_cannot_be_updated() {
        let req = UpdateMatchRequest::default();
        assert_eq!(
            req.merge_into(&game(MatchStatus::Cancelled, true)).unwrap_err(),
            DomainError::MatchCancelled
        );
    }

    #[test]
    fn test_negative_score_rejected() {
        let req = MatchResultRequest {
            score_a: -1,
            score_b: 2,
        };
        assert!(req.validate().unwrap_err().field_errors().contains_key("score_a"));
    }
}
