use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::request::{RequestFilter, RequestResponse, SendRequestPayload},
    services::request_lifecycle::RequestAction,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::middleware::current_user::CurrentUser;

use super::services;

#[utoipa::path(
    post,
    path = "/api/v1/requests",
    params(("x-user-id" = Uuid, Header, description = "Acting user")),
    request_body = SendRequestPayload,
    responses(
        (status = 201, description = "Request sent", body = RequestResponse),
        (status = 400, description = "Invalid sender, receiver or team combination"),
        (status = 403, description = "Only the team manager can invite"),
        (status = 404, description = "Receiver or team not found"),
        (status = 409, description = "Duplicate pending request or player already on roster")
    ),
    tag = "requests"
)]
pub async fn send_request(
    State(db): State<Database>,
    CurrentUser(sender): CurrentUser,
    Json(payload): Json<SendRequestPayload>,
) -> Result<Response, WebError> {
    payload.validate()?;

    let request = services::send_request(db.pool(), &sender, &payload).await?;

    Ok((StatusCode::CREATED, Json(RequestResponse::from(request))).into_response())
}

#[utoipa::path(
    get,
    path = "/api/v1/requests/incoming",
    params(
        RequestFilter,
        ("x-user-id" = Uuid, Header, description = "Acting user")
    ),
    responses(
        (status = 200, description = "Requests addressed to the caller", body = Vec<RequestResponse>),
        (status = 401, description = "Missing or unknown user")
    ),
    tag = "requests"
)]
pub async fn list_incoming(
    State(db): State<Database>,
    CurrentUser(user): CurrentUser,
    Query(filter): Query<RequestFilter>,
) -> Result<Response, WebError> {
    let requests = services::list_incoming(db.pool(), user.user_id, filter.status).await?;

    let response: Vec<RequestResponse> = requests.into_iter().map(RequestResponse::from).collect();

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/v1/requests/outgoing",
    params(
        RequestFilter,
        ("x-user-id" = Uuid, Header, description = "Acting user")
    ),
    responses(
        (status = 200, description = "Requests sent by the caller", body = Vec<RequestResponse>),
        (status = 401, description = "Missing or unknown user")
    ),
    tag = "requests"
)]
pub async fn list_outgoing(
    State(db): State<Database>,
    CurrentUser(user): CurrentUser,
    Query(filter): Query<RequestFilter>,
) -> Result<Response, WebError> {
    let requests = services::list_outgoing(db.pool(), user.user_id, filter.status).await?;

    let response: Vec<RequestResponse> = requests.into_iter().map(RequestResponse::from).collect();

    Ok(Json(response).into_response())
}

async fn apply(db: &Database, actor: &CurrentUser, id: Uuid, action: RequestAction) -> Result<Response, WebError> {
    let request = services::transition(db.pool(), &actor.0, id, action).await?;

    Ok(Json(RequestResponse::from(request)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/v1/requests/{id}/accept",
    params(
        ("id" = Uuid, Path, description = "Request ID"),
        ("x-user-id" = Uuid, Header, description = "Acting user")
    ),
    responses(
        (status = 200, description = "Request accepted, player added to the roster", body = RequestResponse),
        (status = 403, description = "Caller is not the receiver"),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Request is no longer pending")
    ),
    tag = "requests"
)]
pub async fn accept_request(
    State(db): State<Database>,
    actor: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    apply(&db, &actor, id, RequestAction::Accept).await
}

#[utoipa::path(
    post,
    path = "/api/v1/requests/{id}/reject",
    params(
        ("id" = Uuid, Path, description = "Request ID"),
        ("x-user-id" = Uuid, Header, description = "Acting user")
    ),
    responses(
        (status = 200, description = "Request rejected", body = RequestResponse),
        (status = 403, description = "Caller is not the receiver"),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Request is no longer pending")
    ),
    tag = "requests"
)]
pub async fn reject_request(
    State(db): State<Database>,
    actor: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    apply(&db, &actor, id, RequestAction::Reject).await
}

#[utoipa::path(
    post,
    path = "/api/v1/requests/{id}/cancel",
    params(
        ("id" = Uuid, Path, description = "Request ID"),
        ("x-user-id" = Uuid, Header, description = "Acting user")
    ),
    responses(
        (status = 200, description = "Request withdrawn and removed", body = RequestResponse),
        (status = 403, description = "Caller is not the sender"),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Request is no longer pending")
    ),
    tag = "requests"
)]
pub async fn cancel_request(
    State(db): State<Database>,
    actor: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    apply(&db, &actor, id, RequestAction::Cancel).await
}
