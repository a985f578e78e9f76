use axum::{
    Router,
    routing::{delete, get},
};
use storage::Database;

use super::handlers::{create_team, delete_team, get_team, list_teams, remove_player, update_team};

pub fn routes() -> Router<Database> {
    Router::new()
        .route("/", get(list_teams).post(create_team))
        .route("/:id", get(get_team).put(update_team).delete(delete_team))
        .route("/:id/players/:player_id", delete(remove_player))
}
