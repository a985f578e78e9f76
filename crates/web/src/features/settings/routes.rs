use axum::{Router, middleware, routing::get};
use storage::Database;

use super::handlers::{get_settings, update_settings};
use crate::middleware::auth::{ApiKeys, require_auth};

pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    Router::new()
        .route("/settings", get(get_settings).put(update_settings))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth))
}
