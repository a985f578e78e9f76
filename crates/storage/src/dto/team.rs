use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::Team;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TeamResponse {
    pub team_id: Uuid,
    pub name: String,
    pub sport: String,
    pub manager_id: Uuid,
    pub players: Vec<Uuid>,
    pub player_count: usize,
    pub logo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Team> for TeamResponse {
    fn from(team: Team) -> Self {
        Self {
            player_count: team.players.len(),
            team_id: team.team_id,
            name: team.name,
            sport: team.sport,
            manager_id: team.manager_id,
            players: team.players,
            logo_url: team.logo_url,
            created_at: team.created_at,
        }
    }
}

/// Request payload for creating a team. The caller becomes its manager.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateTeamRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Team name must be between 1 and 255 characters"
    ))]
    pub name: String,

    #[validate(length(
        min = 1,
        max = 100,
        message = "Sport must be between 1 and 100 characters"
    ))]
    pub sport: String,

    #[validate(url(message = "Logo must be a valid URL"))]
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateTeamRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub sport: Option<String>,

    #[validate(url)]
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct TeamFilter {
    pub sport: Option<String>,
    pub manager_id: Option<Uuid>,
    /// Only teams whose roster includes this player
    pub player_id: Option<Uuid>,
}
