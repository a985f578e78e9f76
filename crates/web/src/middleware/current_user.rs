use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};
use storage::{Database, error::StorageError, models::User, repository::user::UserRepository};
use uuid::Uuid;

use crate::error::WebError;

/// Header carrying the id of the acting user.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated user making the request, loaded from the users table.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<Database> for CurrentUser {
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, db: &Database) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or(WebError::Unauthorized("missing user header"))?
            .to_str()
            .ok()
            .and_then(|value| Uuid::parse_str(value.trim()).ok())
            .ok_or(WebError::Unauthorized("malformed user header"))?;

        match UserRepository::new(db.pool()).find_by_id(user_id).await {
            Ok(user) => Ok(Self(user)),
            Err(StorageError::NotFound) => {
                tracing::warn!(user_id = %user_id, "Request from unknown user");
                Err(WebError::Unauthorized("unknown user"))
            }
            Err(e) => Err(e.into()),
        }
    }
}
