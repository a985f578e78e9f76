use axum::{Router, routing::get};
use storage::Database;

use super::handlers::{create_user, delete_user, get_me, get_user, list_users, update_user};

pub fn routes() -> Router<Database> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/me", get(get_me))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}
