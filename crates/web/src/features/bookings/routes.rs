use axum::{
    Router, middleware,
    routing::{get, post},
};
use storage::Database;

use super::handlers::{complete_payment, list_my_bookings};
use crate::middleware::auth::{ApiKeys, require_auth};

pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    let protected = Router::new()
        .route("/payments/complete", post(complete_payment))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/bookings/mine", get(list_my_bookings))
        .merge(protected)
}
