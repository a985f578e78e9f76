use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use storage::{
    Database,
    dto::{
        matches::MatchResponse,
        tournament::{
            CreateTournamentRequest, GenerateFixturesRequest, ParticipantsResponse,
            RegistrationRequest, TournamentFilter, TournamentResponse, UpdateTournamentRequest,
        },
    },
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::middleware::current_user::CurrentUser;

use super::services;

#[utoipa::path(
    get,
    path = "/api/v1/tournaments",
    params(TournamentFilter),
    responses(
        (status = 200, description = "List of tournaments with derived status", body = Vec<TournamentResponse>)
    ),
    tag = "tournaments"
)]
pub async fn list_tournaments(
    State(db): State<Database>,
    Query(filter): Query<TournamentFilter>,
) -> Result<Response, WebError> {
    let now = Utc::now();
    let tournaments = services::list_tournaments(db.pool(), &filter, now).await?;

    let response: Vec<TournamentResponse> = tournaments
        .into_iter()
        .map(|t| TournamentResponse::new(t, now))
        .collect();

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/v1/tournaments/{id}",
    params(("id" = Uuid, Path, description = "Tournament ID")),
    responses(
        (status = 200, description = "Tournament found", body = TournamentResponse),
        (status = 404, description = "Tournament not found")
    ),
    tag = "tournaments"
)]
pub async fn get_tournament(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let tournament = services::get_tournament(db.pool(), id).await?;

    Ok(Json(TournamentResponse::new(tournament, Utc::now())).into_response())
}

#[utoipa::path(
    post,
    path = "/api/v1/tournaments",
    params(("x-user-id" = Uuid, Header, description = "Acting user")),
    request_body = CreateTournamentRequest,
    responses(
        (status = 201, description = "Tournament created", body = TournamentResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Missing or unknown user"),
        (status = 403, description = "Caller is not an organizer")
    ),
    tag = "tournaments"
)]
pub async fn create_tournament(
    State(db): State<Database>,
    CurrentUser(actor): CurrentUser,
    Json(req): Json<CreateTournamentRequest>,
) -> Result<Response, WebError> {
    req.validate()?;
    req.validate_schedule()
        .map_err(|e| WebError::BadRequest(e.to_string()))?;

    let tournament = services::create_tournament(db.pool(), &actor, &req).await?;

    Ok((
        StatusCode::CREATED,
        Json(TournamentResponse::new(tournament, Utc::now())),
    )
        .into_response())
}

#[utoipa::path(
    put,
    path = "/api/v1/tournaments/{id}",
    params(
        ("id" = Uuid, Path, description = "Tournament ID"),
        ("x-user-id" = Uuid, Header, description = "Acting user")
    ),
    request_body = UpdateTournamentRequest,
    responses(
        (status = 200, description = "Tournament updated", body = TournamentResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Caller is not the organizer"),
        (status = 404, description = "Tournament not found")
    ),
    tag = "tournaments"
)]
pub async fn update_tournament(
    State(db): State<Database>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTournamentRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let tournament = services::update_tournament(db.pool(), &actor, id, &req).await?;

    Ok(Json(TournamentResponse::new(tournament, Utc::now())).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/v1/tournaments/{id}",
    params(
        ("id" = Uuid, Path, description = "Tournament ID"),
        ("x-user-id" = Uuid, Header, description = "Acting user")
    ),
    responses(
        (status = 204, description = "Tournament deleted"),
        (status = 403, description = "Caller is not the organizer"),
        (status = 404, description = "Tournament not found")
    ),
    tag = "tournaments"
)]
pub async fn delete_tournament(
    State(db): State<Database>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete_tournament(db.pool(), &actor, id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    post,
    path = "/api/v1/tournaments/{id}/cancel",
    params(
        ("id" = Uuid, Path, description = "Tournament ID"),
        ("x-user-id" = Uuid, Header, description = "Acting user")
    ),
    responses(
        (status = 200, description = "Tournament and its unplayed matches cancelled", body = TournamentResponse),
        (status = 403, description = "Caller is not the organizer"),
        (status = 404, description = "Tournament not found"),
        (status = 409, description = "Tournament already cancelled")
    ),
    tag = "tournaments"
)]
pub async fn cancel_tournament(
    State(db): State<Database>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let tournament = services::cancel_tournament(db.pool(), &actor, id).await?;

    Ok(Json(TournamentResponse::new(tournament, Utc::now())).into_response())
}

#[utoipa::path(
    post,
    path = "/api/v1/tournaments/{id}/register",
    params(
        ("id" = Uuid, Path, description = "Tournament ID"),
        ("x-user-id" = Uuid, Header, description = "Acting user")
    ),
    request_body = RegistrationRequest,
    responses(
        (status = 200, description = "Registered, awaiting approval", body = ParticipantsResponse),
        (status = 400, description = "Wrong registration type or payment required"),
        (status = 403, description = "Caller cannot register this participant"),
        (status = 404, description = "Tournament or team not found"),
        (status = 409, description = "Registration closed, full or already registered")
    ),
    tag = "tournaments"
)]
pub async fn register(
    State(db): State<Database>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<RegistrationRequest>,
) -> Result<Response, WebError> {
    let tournament = services::register(db.pool(), &actor, id, req.team_id, Utc::now()).await?;

    Ok(Json(ParticipantsResponse::from(&tournament)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/v1/tournaments/{id}/withdraw",
    params(
        ("id" = Uuid, Path, description = "Tournament ID"),
        ("x-user-id" = Uuid, Header, description = "Acting user")
    ),
    request_body = RegistrationRequest,
    responses(
        (status = 200, description = "Participant withdrawn", body = ParticipantsResponse),
        (status = 400, description = "Participant is not registered"),
        (status = 403, description = "Caller cannot act for this participant"),
        (status = 404, description = "Tournament or team not found")
    ),
    tag = "tournaments"
)]
pub async fn withdraw(
    State(db): State<Database>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<RegistrationRequest>,
) -> Result<Response, WebError> {
    let tournament = services::withdraw(db.pool(), &actor, id, req.team_id).await?;

    Ok(Json(ParticipantsResponse::from(&tournament)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/v1/tournaments/{id}/participants",
    params(("id" = Uuid, Path, description = "Tournament ID")),
    responses(
        (status = 200, description = "Registered, approved and pending participants", body = ParticipantsResponse),
        (status = 404, description = "Tournament not found")
    ),
    tag = "tournaments"
)]
pub async fn list_participants(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let tournament = services::get_tournament(db.pool(), id).await?;

    Ok(Json(ParticipantsResponse::from(&tournament)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/v1/tournaments/{id}/participants/{participant_id}/approve",
    params(
        ("id" = Uuid, Path, description = "Tournament ID"),
        ("participant_id" = Uuid, Path, description = "Registered team or player"),
        ("x-user-id" = Uuid, Header, description = "Acting user")
    ),
    responses(
        (status = 200, description = "Participant approved", body = ParticipantsResponse),
        (status = 400, description = "Participant is not registered"),
        (status = 403, description = "Caller is not the organizer"),
        (status = 404, description = "Tournament not found")
    ),
    tag = "tournaments"
)]
pub async fn approve_participant(
    State(db): State<Database>,
    CurrentUser(actor): CurrentUser,
    Path((id, participant_id)): Path<(Uuid, Uuid)>,
) -> Result<Response, WebError> {
    let tournament = services::approve_participant(db.pool(), &actor, id, participant_id).await?;

    Ok(Json(ParticipantsResponse::from(&tournament)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/v1/tournaments/{id}/participants/{participant_id}/reject",
    params(
        ("id" = Uuid, Path, description = "Tournament ID"),
        ("participant_id" = Uuid, Path, description = "Registered team or player"),
        ("x-user-id" = Uuid, Header, description = "Acting user")
    ),
    responses(
        (status = 200, description = "Participant removed from the registration list", body = ParticipantsResponse),
        (status = 400, description = "Participant is not registered"),
        (status = 403, description = "Caller is not the organizer"),
        (status = 404, description = "Tournament not found")
    ),
    tag = "tournaments"
)]
pub async fn reject_participant(
    State(db): State<Database>,
    CurrentUser(actor): CurrentUser,
    Path((id, participant_id)): Path<(Uuid, Uuid)>,
) -> Result<Response, WebError> {
    let tournament = services::reject_participant(db.pool(), &actor, id, participant_id).await?;

    Ok(Json(ParticipantsResponse::from(&tournament)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/v1/tournaments/{id}/fixtures",
    params(
        ("id" = Uuid, Path, description = "Tournament ID"),
        ("x-user-id" = Uuid, Header, description = "Acting user")
    ),
    request_body = GenerateFixturesRequest,
    responses(
        (status = 201, description = "Fixtures created", body = Vec<MatchResponse>),
        (status = 400, description = "Fewer than two approved participants"),
        (status = 403, description = "Caller is not the organizer"),
        (status = 404, description = "Tournament not found"),
        (status = 409, description = "Tournament cancelled or fixtures already exist")
    ),
    tag = "tournaments"
)]
pub async fn generate_fixtures(
    State(db): State<Database>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<GenerateFixturesRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let matches = services::generate_fixtures(db.pool(), &actor, id, &req).await?;

    let now = Utc::now();
    let response: Vec<MatchResponse> = matches
        .into_iter()
        .map(|m| MatchResponse::new(m, now))
        .collect();

    Ok((StatusCode::CREATED, Json(response)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/v1/tournaments/{id}/matches",
    params(("id" = Uuid, Path, description = "Tournament ID")),
    responses(
        (status = 200, description = "Matches of the tournament", body = Vec<MatchResponse>),
        (status = 404, description = "Tournament not found")
    ),
    tag = "tournaments"
)]
pub async fn list_matches(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let matches = services::list_matches(db.pool(), id).await?;

    let now = Utc::now();
    let response: Vec<MatchResponse> = matches
        .into_iter()
        .map(|m| MatchResponse::new(m, now))
        .collect();

    Ok(Json(response).into_response())
}
