use axum::{Json, extract::State};
use serde::Serialize;
use storage::Database;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: &'static str,
    pub version: &'static str,
    pub database: bool,
}

#[utoipa::path(
    get,
    path = "/api/v1/health",
    responses(
        (status = 200, description = "Service is up; `database` reports pool reachability", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health(State(db): State<Database>) -> Json<HealthResponse> {
    let database = sqlx::query("SELECT 1").execute(db.pool()).await.is_ok();

    Json(HealthResponse {
        ok: true,
        service: "matchday",
        version: env!("CARGO_PKG_VERSION"),
        database,
    })
}
