use chrono::{DateTime, Utc};
use sqlx::PgPool;
use storage::{
    dto::booking::CompletePaymentRequest,
    error::Result,
    models::{Booking, User},
    repository::{
        booking::BookingRepository, settings::SettingsRepository, tournament::TournamentRepository,
    },
};
use uuid::Uuid;

use crate::features::tournaments::services::{ensure_registrations_enabled, resolve_participant};

/// Open a booking for a paid tournament. The payer is registered once the
/// gateway reports a successful payment.
pub async fn create_booking(
    pool: &PgPool,
    actor: &User,
    tournament_id: Uuid,
    team_id: Option<Uuid>,
    now: DateTime<Utc>,
) -> Result<Booking> {
    ensure_registrations_enabled(pool).await?;

    let tournament = TournamentRepository::new(pool).find_by_id(tournament_id).await?;
    let payer_id = resolve_participant(pool, actor, &tournament, team_id).await?;
    let settings = SettingsRepository::new(pool).get().await?;

    BookingRepository::new(pool)
        .create(
            tournament_id,
            tournament.registration_type,
            payer_id,
            actor.user_id,
            &settings.currency,
            now,
        )
        .await
}

pub async fn list_bookings(pool: &PgPool, user_id: Uuid) -> Result<Vec<Booking>> {
    let repo = BookingRepository::new(pool);
    repo.list_for_user(user_id).await
}

pub async fn complete_payment(pool: &PgPool, request: &CompletePaymentRequest) -> Result<Booking> {
    let repo = BookingRepository::new(pool);
    repo.complete(
        &request.gateway_order_id,
        request.gateway_payment_id.as_deref(),
        request.success,
    )
    .await
}
