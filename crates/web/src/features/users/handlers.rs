use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::{
        common::{PaginatedResponse, PaginationParams},
        user::{CreateUserRequest, UpdateUserRequest, UserFilter, UserResponse},
    },
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::middleware::current_user::CurrentUser;

use super::services;

#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(PaginationParams, UserFilter),
    responses(
        (status = 200, description = "Page of users", body = PaginatedResponse<UserResponse>),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "users"
)]
pub async fn list_users(
    State(db): State<Database>,
    Query(pagination): Query<PaginationParams>,
    Query(filter): Query<UserFilter>,
) -> Result<Response, WebError> {
    pagination.validate().map_err(WebError::BadRequest)?;

    let (users, total_items) = services::list_users(db.pool(), &filter, &pagination).await?;

    let data = users.into_iter().map(UserResponse::from).collect();

    Ok(Json(PaginatedResponse::new(data, &pagination, total_items)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    params(("x-user-id" = Uuid, Header, description = "Acting user")),
    responses(
        (status = 200, description = "The calling user", body = UserResponse),
        (status = 401, description = "Missing or unknown user")
    ),
    tag = "users"
)]
pub async fn get_me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from(user))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found")
    ),
    tag = "users"
)]
pub async fn get_user(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let user = services::get_user(db.pool(), id).await?;

    Ok(Json(UserResponse::from(user)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Role cannot be self-assigned"),
        (status = 409, description = "Email already registered")
    ),
    tag = "users"
)]
pub async fn create_user(
    State(db): State<Database>,
    Json(req): Json<CreateUserRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let user = services::create_user(db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))).into_response())
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(
        ("id" = Uuid, Path, description = "User ID"),
        ("x-user-id" = Uuid, Header, description = "Acting user")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Missing or unknown user"),
        (status = 403, description = "Not your account"),
        (status = 404, description = "User not found")
    ),
    tag = "users"
)]
pub async fn update_user(
    State(db): State<Database>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let updated = services::update_user(db.pool(), &actor, id, &req).await?;

    Ok(Json(UserResponse::from(updated)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(
        ("id" = Uuid, Path, description = "User ID"),
        ("x-user-id" = Uuid, Header, description = "Acting user")
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 401, description = "Missing or unknown user"),
        (status = 403, description = "Not your account"),
        (status = 404, description = "User not found")
    ),
    tag = "users"
)]
pub async fn delete_user(
    State(db): State<Database>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete_user(db.pool(), &actor, id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
