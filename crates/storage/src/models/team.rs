use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Team {
    pub team_id: Uuid,
    pub name: String,
    pub sport: String,
    pub manager_id: Uuid,
    pub players: Vec<Uuid>,
    pub logo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Team {
    pub fn has_player(&self, player_id: Uuid) -> bool {
        self.players.contains(&player_id)
    }

    /// Adds a player to the roster. Returns `false` when already present.
    pub fn add_player(&mut self, player_id: Uuid) -> bool {
        if self.has_player(player_id) {
            return false;
        }
        self.players.push(player_id);
        true
    }

    /// Removes a player from the roster. Returns `false` when absent.
    pub fn remove_player(&mut self, player_id: Uuid) -> bool {
        let before = self.players.len();
        self.players.retain(|p| *p != player_id);
        self.players.len() != before
    }
}
