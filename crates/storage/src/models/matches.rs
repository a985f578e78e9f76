use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::ParticipantKind;

/// Match status labels. Used both for the persisted `status` column and for
/// the clock-derived status reported alongside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "match_status", rename_all = "snake_case")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    Scheduled,
    Live,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Match {
    pub match_id: Uuid,
    pub tournament_id: Option<Uuid>,
    pub participant_kind: ParticipantKind,
    pub participant_a: Uuid,
    pub participant_b: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub venue: Option<String>,
    pub round: i32,
    pub is_cancelled: bool,
    pub status: MatchStatus,
    pub score_a: Option<i32>,
    pub score_b: Option<i32>,
    pub winner: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Match {
    /// Winner implied by a final score; `None` for a draw.
    pub fn winner_for(&self, score_a: i32, score_b: i32) -> Option<Uuid> {
        match score_a.cmp(&score_b) {
            std::cmp::Ordering::Greater => Some(self.participant_a),
            std::cmp::Ordering::Less => Some(self.participant_b),
            std::cmp::Ordering::Equal => None,
        }
    }
}
