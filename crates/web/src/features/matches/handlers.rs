use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use storage::{
    Database,
    dto::matches::{
        CreateMatchRequest, MatchFilter, MatchResponse, MatchResultRequest, UpdateMatchRequest,
    },
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::middleware::current_user::CurrentUser;

use super::services;

#[utoipa::path(
    get,
    path = "/api/v1/matches",
    params(MatchFilter),
    responses(
        (status = 200, description = "Matches ordered by kick-off", body = Vec<MatchResponse>)
    ),
    tag = "matches"
)]
pub async fn list_matches(
    State(db): State<Database>,
    Query(filter): Query<MatchFilter>,
) -> Result<Response, WebError> {
    let matches = services::list_matches(db.pool(), &filter).await?;

    let now = Utc::now();
    let response: Vec<MatchResponse> = matches
        .into_iter()
        .map(|m| MatchResponse::new(m, now))
        .collect();

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/v1/matches/{id}",
    params(("id" = Uuid, Path, description = "Match ID")),
    responses(
        (status = 200, description = "Match found", body = MatchResponse),
        (status = 404, description = "Match not found")
    ),
    tag = "matches"
)]
pub async fn get_match(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let game = services::get_match(db.pool(), id).await?;

    Ok(Json(MatchResponse::new(game, Utc::now())).into_response())
}

#[utoipa::path(
    post,
    path = "/api/v1/matches",
    params(("x-user-id" = Uuid, Header, description = "Acting user")),
    request_body = CreateMatchRequest,
    responses(
        (status = 201, description = "Match scheduled", body = MatchResponse),
        (status = 400, description = "Validation error or participants not approved"),
        (status = 403, description = "Caller cannot manage matches here"),
        (status = 404, description = "Tournament not found"),
        (status = 409, description = "Tournament is cancelled")
    ),
    tag = "matches"
)]
pub async fn create_match(
    State(db): State<Database>,
    CurrentUser(actor): CurrentUser,
    Json(req): Json<CreateMatchRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let game = services::create_match(db.pool(), &actor, &req).await?;

    Ok((StatusCode::CREATED, Json(MatchResponse::new(game, Utc::now()))).into_response())
}

#[utoipa::path(
    put,
    path = "/api/v1/matches/{id}",
    params(
        ("id" = Uuid, Path, description = "Match ID"),
        ("x-user-id" = Uuid, Header, description = "Acting user")
    ),
    request_body = UpdateMatchRequest,
    responses(
        (status = 200, description = "Match updated", body = MatchResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Caller cannot manage this match"),
        (status = 404, description = "Match not found"),
        (status = 409, description = "Match is cancelled or completed")
    ),
    tag = "matches"
)]
pub async fn update_match(
    State(db): State<Database>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateMatchRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let game = services::update_match(db.pool(), &actor, id, &req).await?;

    Ok(Json(MatchResponse::new(game, Utc::now())).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/v1/matches/{id}",
    params(
        ("id" = Uuid, Path, description = "Match ID"),
        ("x-user-id" = Uuid, Header, description = "Acting user")
    ),
    responses(
        (status = 204, description = "Match deleted"),
        (status = 403, description = "Caller cannot manage this match"),
        (status = 404, description = "Match not found")
    ),
    tag = "matches"
)]
pub async fn delete_match(
    State(db): State<Database>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete_match(db.pool(), &actor, id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    post,
    path = "/api/v1/matches/{id}/result",
    params(
        ("id" = Uuid, Path, description = "Match ID"),
        ("x-user-id" = Uuid, Header, description = "Acting user")
    ),
    request_body = MatchResultRequest,
    responses(
        (status = 200, description = "Result recorded, match completed", body = MatchResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Caller cannot manage this match"),
        (status = 404, description = "Match not found"),
        (status = 409, description = "Match is cancelled")
    ),
    tag = "matches"
)]
pub async fn record_result(
    State(db): State<Database>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<MatchResultRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let game = services::record_result(db.pool(), &actor, id, &req).await?;

    Ok(Json(MatchResponse::new(game, Utc::now())).into_response())
}

#[utoipa::path(
    post,
    path = "/api/v1/matches/{id}/cancel",
    params(
        ("id" = Uuid, Path, description = "Match ID"),
        ("x-user-id" = Uuid, Header, description = "Acting user")
    ),
    responses(
        (status = 200, description = "Match cancelled", body = MatchResponse),
        (status = 403, description = "Caller cannot manage this match"),
        (status = 404, description = "Match not found"),
        (status = 409, description = "Match already cancelled or completed")
    ),
    tag = "matches"
)]
pub async fn cancel_match(
    State(db): State<Database>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let game = services::cancel_match(db.pool(), &actor, id).await?;

    Ok(Json(MatchResponse::new(game, Utc::now())).into_response())
}
