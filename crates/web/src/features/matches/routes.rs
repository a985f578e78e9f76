use axum::{
    Router,
    routing::{get, post},
};
use storage::Database;

use super::handlers::{
    cancel_match, create_match, delete_match, get_match, list_matches, record_result, update_match,
};

pub fn routes() -> Router<Database> {
    Router::new()
        .route("/", get(list_matches).post(create_match))
        .route("/:id", get(get_match).put(update_match).delete(delete_match))
        .route("/:id/result", post(record_result))
        .route("/:id/cancel", post(cancel_match))
}
