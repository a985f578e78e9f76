use axum::Router;
use storage::Database;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::error::WebError;
use crate::features;
use crate::middleware::auth::ApiKeys;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::health::handlers::health,
        features::users::handlers::list_users,
        features::users::handlers::get_me,
        features::users::handlers::get_user,
        features::users::handlers::create_user,
        features::users::handlers::update_user,
        features::users::handlers::delete_user,
        features::teams::handlers::list_teams,
        features::teams::handlers::get_team,
        features::teams::handlers::create_team,
        features::teams::handlers::update_team,
        features::teams::handlers::delete_team,
        features::teams::handlers::remove_player,
        features::tournaments::handlers::list_tournaments,
        features::tournaments::handlers::get_tournament,
        features::tournaments::handlers::create_tournament,
        features::tournaments::handlers::update_tournament,
        features::tournaments::handlers::delete_tournament,
        features::tournaments::handlers::cancel_tournament,
        features::tournaments::handlers::register,
        features::tournaments::handlers::withdraw,
        features::tournaments::handlers::list_participants,
        features::tournaments::handlers::approve_participant,
        features::tournaments::handlers::reject_participant,
        features::tournaments::handlers::generate_fixtures,
        features::tournaments::handlers::list_matches,
        features::matches::handlers::list_matches,
        features::matches::handlers::get_match,
        features::matches::handlers::create_match,
        features::matches::handlers::update_match,
        features::matches::handlers::delete_match,
        features::matches::handlers::record_result,
        features::matches::handlers::cancel_match,
        features::requests::handlers::send_request,
        features::requests::handlers::list_incoming,
        features::requests::handlers::list_outgoing,
        features::requests::handlers::accept_request,
        features::requests::handlers::reject_request,
        features::requests::handlers::cancel_request,
        features::bookings::handlers::create_booking,
        features::bookings::handlers::list_my_bookings,
        features::bookings::handlers::complete_payment,
        features::settings::handlers::get_settings,
        features::settings::handlers::update_settings,
    ),
    components(
        schemas(
            features::health::handlers::HealthResponse,
            storage::dto::common::PaginationMeta,
            storage::dto::user::UserResponse,
            storage::dto::user::CreateUserRequest,
            storage::dto::user::UpdateUserRequest,
            storage::dto::team::TeamResponse,
            storage::dto::team::CreateTeamRequest,
            storage::dto::team::UpdateTeamRequest,
            storage::dto::tournament::TournamentResponse,
            storage::dto::tournament::CreateTournamentRequest,
            storage::dto::tournament::UpdateTournamentRequest,
            storage::dto::tournament::RegistrationRequest,
            storage::dto::tournament::ParticipantsResponse,
            storage::dto::tournament::GenerateFixturesRequest,
            storage::dto::matches::MatchResponse,
            storage::dto::matches::CreateMatchRequest,
            storage::dto::matches::UpdateMatchRequest,
            storage::dto::matches::MatchResultRequest,
            storage::dto::request::RequestResponse,
            storage::dto::request::SendRequestPayload,
            storage::dto::booking::BookingResponse,
            storage::dto::booking::CompletePaymentRequest,
            storage::dto::settings::UpdateSettingsRequest,
            storage::models::Role,
            storage::models::ParticipantKind,
            storage::models::TournamentStatus,
            storage::models::MatchStatus,
            storage::models::RequestType,
            storage::models::RequestStatus,
            storage::models::PaymentStatus,
            storage::models::PlatformSettings,
            storage::services::fixtures::FixtureFormat,
        )
    ),
    tags(
        (name = "health", description = "Liveness"),
        (name = "users", description = "Players, team managers, organizers and admins"),
        (name = "teams", description = "Teams and their rosters"),
        (name = "tournaments", description = "Tournaments, registration, approval and fixtures"),
        (name = "matches", description = "Scheduled matches and results"),
        (name = "requests", description = "Join requests and invites between players and teams"),
        (name = "bookings", description = "Paid registrations"),
        (name = "admin", description = "Platform settings, API key required"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("API Key")
                        .build(),
                ),
            )
        }
    }
}

fn api_routes(api_keys: ApiKeys) -> Router<Database> {
    Router::new()
        .merge(features::health::routes::routes())
        .nest("/users", features::users::routes::routes())
        .nest("/teams", features::teams::routes::routes())
        .nest("/tournaments", features::tournaments::routes::routes())
        .nest("/matches", features::matches::routes::routes())
        .nest("/requests", features::requests::routes::routes())
        .nest("/admin", features::settings::routes::routes(api_keys.clone()))
        .merge(features::bookings::routes::routes(api_keys))
}

/// Full application router: the versioned API, Swagger UI and the shared layers.
pub fn router(db: Database, api_keys: ApiKeys) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api/v1", api_routes(api_keys))
        .fallback(|| async { WebError::NotFound })
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(db)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use serde_json::Value;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::middleware::current_user::USER_ID_HEADER;

    // Nothing listens on port 1, so any query fails fast.
    fn test_router() -> Router {
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(500))
            .connect_lazy("postgres://matchday@127.0.0.1:1/matchday")
            .expect("lazy pool");
        router(
            Database::from_pool(pool),
            ApiKeys::from_comma_separated("test-key"),
        )
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn test_health_reports_unreachable_database() {
        let response = test_router()
            .oneshot(
                Request::get("/api/v1/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["ok"], true);
        assert_eq!(body["database"], false);
        assert_eq!(body["service"], "matchday");
    }

    #[tokio::test]
    async fn test_missing_user_header_is_unauthorized() {
        let response = test_router()
            .oneshot(
                Request::get("/api/v1/users/me")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Unauthorized");
    }

    #[tokio::test]
    async fn test_malformed_user_header_is_unauthorized() {
        let response = test_router()
            .oneshot(
                Request::post("/api/v1/tournaments")
                    .header(USER_ID_HEADER, "not-a-uuid")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_settings_require_api_key() {
        let response = test_router()
            .oneshot(
                Request::get("/api/v1/admin/settings")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_payment_completion_rejects_wrong_key() {
        let response = test_router()
            .oneshot(
                Request::post("/api/v1/payments/complete")
                    .header(header::AUTHORIZATION, "Bearer wrong-key")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"gateway_order_id":"order_1","success":true}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_invalid_signup_is_bad_request_with_details() {
        let response = test_router()
            .oneshot(
                Request::post("/api/v1/users")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name":"","email":"not-an-email"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Validation failed");
        assert_eq!(body["details"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn test_invalid_pagination_is_bad_request() {
        let response = test_router()
            .oneshot(
                Request::get("/api/v1/users?page=0")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_not_found() {
        let response = test_router()
            .oneshot(
                Request::get("/api/v1/nowhere")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Resource not found");
    }

    #[tokio::test]
    async fn test_openapi_document_lists_api_paths() {
        let response = test_router()
            .oneshot(
                Request::get("/api-docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert!(body["paths"]["/api/v1/requests/{id}/accept"].is_object());
        assert!(body["paths"]["/api/v1/tournaments/{id}/fixtures"].is_object());
    }
}
