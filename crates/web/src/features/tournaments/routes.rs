use axum::{
    Router,
    routing::{get, post},
};
use storage::Database;

use super::handlers::{
    approve_participant, cancel_tournament, create_tournament, delete_tournament,
    generate_fixtures, get_tournament, list_matches, list_participants, list_tournaments,
    register, reject_participant, update_tournament, withdraw,
};
use crate::features::bookings::handlers::create_booking;

pub fn routes() -> Router<Database> {
    Router::new()
        .route("/", get(list_tournaments).post(create_tournament))
        .route(
            "/:id",
            get(get_tournament)
                .put(update_tournament)
                .delete(delete_tournament),
        )
        .route("/:id/cancel", post(cancel_tournament))
        .route("/:id/register", post(register))
        .route("/:id/withdraw", post(withdraw))
        .route("/:id/participants", get(list_participants))
        .route(
            "/:id/participants/:participant_id/approve",
            post(approve_participant),
        )
        .route(
            "/:id/participants/:participant_id/reject",
            post(reject_participant),
        )
        .route("/:id/fixtures", post(generate_fixtures))
        .route("/:id/matches", get(list_matches))
        .route("/:id/bookings", post(create_booking))
}
