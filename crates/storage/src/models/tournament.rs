use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::services::participants::ParticipantRoster;

/// Who takes part in a tournament or a match: whole teams or individual players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "participant_kind", rename_all = "snake_case")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParticipantKind {
    Team,
    Player,
}

impl fmt::Display for ParticipantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Team => write!(f, "TEAM"),
            Self::Player => write!(f, "PLAYER"),
        }
    }
}

/// Display status, derived from the clock on every read and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TournamentStatus {
    Upcoming,
    Live,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Tournament {
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
    pub registered_teams: Vec<Uuid>,
    pub approved_teams: Vec<Uuid>,
    pub registered_players: Vec<Uuid>,
    pub approved_players: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Tournament {
    /// The registered/approved pair matching `registration_type`.
    pub fn roster(&self) -> ParticipantRoster {
        match self.registration_type {
            ParticipantKind::Team => {
                ParticipantRoster::new(self.registered_teams.clone(), self.approved_teams.clone())
            }
            ParticipantKind::Player => ParticipantRoster::new(
                self.registered_players.clone(),
                self.approved_players.clone(),
            ),
        }
    }

    pub fn set_roster(&mut self, roster: ParticipantRoster) {
        let (registered, approved) = roster.into_parts();
        match self.registration_type {
            ParticipantKind::Team => {
                self.registered_teams = registered;
                self.approved_teams = approved;
            }
            ParticipantKind::Player => {
                self.registered_players = registered;
                self.approved_players = approved;
            }
        }
    }

    pub fn capacity(&self) -> Option<usize> {
        self.max_participants
            .and_then(|max| usize::try_from(max).ok())
    }

    pub fn is_free(&self) -> bool {
        self.entry_fee <= Decimal::ZERO
    }
}
