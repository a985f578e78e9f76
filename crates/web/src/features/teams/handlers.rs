use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::team::{CreateTeamRequest, TeamFilter, TeamResponse, UpdateTeamRequest},
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::middleware::current_user::CurrentUser;

use super::services;

#[utoipa::path(
    get,
    path = "/api/v1/teams",
    params(TeamFilter),
    responses(
        (status = 200, description = "List of teams", body = Vec<TeamResponse>)
    ),
    tag = "teams"
)]
pub async fn list_teams(
    State(db): State<Database>,
    Query(filter): Query<TeamFilter>,
) -> Result<Response, WebError> {
    let teams = services::list_teams(db.pool(), &filter).await?;

    let response: Vec<TeamResponse> = teams.into_iter().map(TeamResponse::from).collect();

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/v1/teams/{id}",
    params(("id" = Uuid, Path, description = "Team ID")),
    responses(
        (status = 200, description = "Team found", body = TeamResponse),
        (status = 404, description = "Team not found")
    ),
    tag = "teams"
)]
pub async fn get_team(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let team = services::get_team(db.pool(), id).await?;

    Ok(Json(TeamResponse::from(team)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/v1/teams",
    params(("x-user-id" = Uuid, Header, description = "Acting user")),
    request_body = CreateTeamRequest,
    responses(
        (status = 201, description = "Team created", body = TeamResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Missing or unknown user"),
        (status = 403, description = "Caller is not a team manager")
    ),
    tag = "teams"
)]
pub async fn create_team(
    State(db): State<Database>,
    CurrentUser(actor): CurrentUser,
    Json(req): Json<CreateTeamRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let team = services::create_team(db.pool(), &actor, &req).await?;

    Ok((StatusCode::CREATED, Json(TeamResponse::from(team))).into_response())
}

#[utoipa::path(
    put,
    path = "/api/v1/teams/{id}",
    params(
        ("id" = Uuid, Path, description = "Team ID"),
        ("x-user-id" = Uuid, Header, description = "Acting user")
    ),
    request_body = UpdateTeamRequest,
    responses(
        (status = 200, description = "Team updated", body = TeamResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Caller does not manage this team"),
        (status = 404, description = "Team not found")
    ),
    tag = "teams"
)]
pub async fn update_team(
    State(db): State<Database>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTeamRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let team = services::update_team(db.pool(), &actor, id, &req).await?;

    Ok(Json(TeamResponse::from(team)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/v1/teams/{id}",
    params(
        ("id" = Uuid, Path, description = "Team ID"),
        ("x-user-id" = Uuid, Header, description = "Acting user")
    ),
    responses(
        (status = 204, description = "Team deleted"),
        (status = 403, description = "Caller does not manage this team"),
        (status = 404, description = "Team not found")
    ),
    tag = "teams"
)]
pub async fn delete_team(
    State(db): State<Database>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete_team(db.pool(), &actor, id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    delete,
    path = "/api/v1/teams/{id}/players/{player_id}",
    params(
        ("id" = Uuid, Path, description = "Team ID"),
        ("player_id" = Uuid, Path, description = "Player to remove"),
        ("x-user-id" = Uuid, Header, description = "Acting user")
    ),
    responses(
        (status = 200, description = "Updated team", body = TeamResponse),
        (status = 400, description = "Player is not on this team"),
        (status = 403, description = "Caller may not change this roster"),
        (status = 404, description = "Team not found")
    ),
    tag = "teams"
)]
pub async fn remove_player(
    State(db): State<Database>,
    CurrentUser(actor): CurrentUser,
    Path((id, player_id)): Path<(Uuid, Uuid)>,
) -> Result<Response, WebError> {
    let team = services::remove_player(db.pool(), &actor, id, player_id).await?;

    Ok(Json(TeamResponse::from(team)).into_response())
}
