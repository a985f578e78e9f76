use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use storage::{Database, dto::settings::UpdateSettingsRequest, models::PlatformSettings};
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/v1/admin/settings",
    responses(
        (status = 200, description = "Current platform settings", body = PlatformSettings),
        (status = 401, description = "Missing or invalid API key")
    ),
    tag = "admin",
    security(("bearer_auth" = []))
)]
pub async fn get_settings(State(db): State<Database>) -> Result<Response, WebError> {
    let settings = services::get_settings(db.pool()).await?;

    Ok(Json(settings).into_response())
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/settings",
    request_body = UpdateSettingsRequest,
    responses(
        (status = 200, description = "Settings updated", body = PlatformSettings),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Missing or invalid API key")
    ),
    tag = "admin",
    security(("bearer_auth" = []))
)]
pub async fn update_settings(
    State(db): State<Database>,
    Json(req): Json<UpdateSettingsRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let settings = services::update_settings(db.pool(), &req).await?;

    Ok(Json(settings).into_response())
}
