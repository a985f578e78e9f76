use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use storage::{
    Database,
    dto::{
        booking::{BookingResponse, CompletePaymentRequest},
        tournament::RegistrationRequest,
    },
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::middleware::current_user::CurrentUser;

use super::services;

#[utoipa::path(
    post,
    path = "/api/v1/tournaments/{id}/bookings",
    params(
        ("id" = Uuid, Path, description = "Tournament ID"),
        ("x-user-id" = Uuid, Header, description = "Acting user")
    ),
    request_body = RegistrationRequest,
    responses(
        (status = 201, description = "Booking awaiting payment", body = BookingResponse),
        (status = 400, description = "Free tournament or wrong registration type"),
        (status = 403, description = "Caller cannot book for this participant"),
        (status = 404, description = "Tournament or team not found"),
        (status = 409, description = "Registration closed, full, already registered or booking pending")
    ),
    tag = "bookings"
)]
pub async fn create_booking(
    State(db): State<Database>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<RegistrationRequest>,
) -> Result<Response, WebError> {
    let booking = services::create_booking(db.pool(), &actor, id, req.team_id, Utc::now()).await?;

    Ok((StatusCode::CREATED, Json(BookingResponse::from(booking))).into_response())
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings/mine",
    params(("x-user-id" = Uuid, Header, description = "Acting user")),
    responses(
        (status = 200, description = "Bookings paid for by the caller", body = Vec<BookingResponse>),
        (status = 401, description = "Missing or unknown user")
    ),
    tag = "bookings"
)]
pub async fn list_my_bookings(
    State(db): State<Database>,
    CurrentUser(user): CurrentUser,
) -> Result<Response, WebError> {
    let bookings = services::list_bookings(db.pool(), user.user_id).await?;

    let response: Vec<BookingResponse> = bookings.into_iter().map(BookingResponse::from).collect();

    Ok(Json(response).into_response())
}

#[utoipa::path(
    post,
    path = "/api/v1/payments/complete",
    request_body = CompletePaymentRequest,
    responses(
        (status = 200, description = "Booking settled", body = BookingResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Missing or invalid API key"),
        (status = 404, description = "Unknown order"),
        (status = 409, description = "Booking already settled")
    ),
    tag = "bookings",
    security(("bearer_auth" = []))
)]
pub async fn complete_payment(
    State(db): State<Database>,
    Json(req): Json<CompletePaymentRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let booking = services::complete_payment(db.pool(), &req).await?;

    Ok(Json(BookingResponse::from(booking)).into_response())
}
