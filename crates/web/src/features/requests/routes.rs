use axum::{
    Router,
    routing::{get, post},
};
use storage::Database;

use super::handlers::{
    accept_request, cancel_request, list_incoming, list_outgoing, reject_request, send_request,
};

pub fn routes() -> Router<Database> {
    Router::new()
        .route("/", post(send_request))
        .route("/incoming", get(list_incoming))
        .route("/outgoing", get(list_outgoing))
        .route("/:id/accept", post(accept_request))
        .route("/:id/reject", post(reject_request))
        .route("/:id/cancel", post(cancel_request))
}
