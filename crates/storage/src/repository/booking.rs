use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::{DomainError, Result, StorageError};
use crate::models::{Booking, ParticipantKind, PaymentStatus};
use crate::repository::tournament::TournamentRepository;
use crate::services::payments;

/// Repository for tournament bookings and their payment state
pub struct BookingRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BookingRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(
            r#"
            SELECT booking_id, tournament_id, payer_kind, payer_id, user_id, amount, currency,
                   payment_status, gateway_order_id, gateway_payment_id, created_at, updated_at
            FROM bookings
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(bookings)
    }

    /// Opens a PENDING booking for `payer_id` at the tournament's entry fee.
    pub async fn create(
        &self,
        tournament_id: Uuid,
        payer_kind: ParticipantKind,
        payer_id: Uuid,
        user_id: Uuid,
        currency: &str,
        now: DateTime<Utc>,
    ) -> Result<Booking> {
        let mut tx = self.pool.begin().await?;
        let tournament = TournamentRepository::lock(&mut tx, tournament_id).await?;

        payments::ensure_bookable(&tournament, now)?;

        if tournament.registration_type != payer_kind {
            return Err(DomainError::RegistrationTypeMismatch {
                expected: tournament.registration_type,
            }
            .into());
        }

        let roster = tournament.roster();
        if roster.is_registered(payer_id) {
            return Err(DomainError::AlreadyRegistered.into());
        }
        if let Some(max) = tournament.capacity()
            && roster.registered().len() >= max
        {
            return Err(DomainError::CapacityReached(max).into());
        }

        let pending: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM bookings
            WHERE tournament_id = $1 AND payer_id = $2 AND payment_status = 'pending'
            "#,
        )
        .bind(tournament_id)
        .bind(payer_id)
        .fetch_one(&mut *tx)
        .await?;
        if pending > 0 {
            return Err(DomainError::BookingInProgress.into());
        }

        let booking_id = Uuid::new_v4();
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (
                booking_id, tournament_id, payer_kind, payer_id, user_id,
                amount, currency, gateway_order_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING booking_id, tournament_id, payer_kind, payer_id, user_id, amount, currency,
                      payment_status, gateway_order_id, gateway_payment_id, created_at, updated_at
            "#,
        )
        .bind(booking_id)
        .bind(tournament_id)
        .bind(payer_kind)
        .bind(payer_id)
        .bind(user_id)
        .bind(tournament.entry_fee)
        .bind(currency)
        .bind(payments::order_reference(booking_id))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            booking_id = %booking.booking_id,
            tournament_id = %tournament_id,
            amount = %booking.amount,
            "Booking opened"
        );

        Ok(booking)
    }

    /// Applies the gateway's completion callback. A successful payment
    /// registers the payer with the tournament in the same transaction.
    pub async fn complete(
        &self,
        gateway_order_id: &str,
        gateway_payment_id: Option<&str>,
        success: bool,
    ) -> Result<Booking> {
        let mut tx = self.pool.begin().await?;
        let booking = Self::lock_by_order(&mut tx, gateway_order_id).await?;

        let status = payments::settle(&booking, success)?;

        let booking = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET payment_status = $2, gateway_payment_id = $3, updated_at = NOW()
            WHERE booking_id = $1
            RETURNING booking_id, tournament_id, payer_kind, payer_id, user_id, amount, currency,
                      payment_status, gateway_order_id, gateway_payment_id, created_at, updated_at
            "#,
        )
        .bind(booking.booking_id)
        .bind(status)
        .bind(gateway_payment_id)
        .fetch_one(&mut *tx)
        .await?;

        if status == PaymentStatus::Paid {
            let mut tournament = TournamentRepository::lock(&mut tx, booking.tournament_id).await?;
            let mut roster = tournament.roster();
            match payments::apply_payment(&tournament, &mut roster, booking.payer_id) {
                Ok(true) => {
                    tournament.set_roster(roster);
                    TournamentRepository::save_roster(&mut tx, &tournament).await?;
                }
                Ok(false) => {}
                Err(err) => {
                    tracing::warn!(
                        booking_id = %booking.booking_id,
                        error = %err,
                        "Paid booking could not be registered, refund required"
                    );
                }
            }
        }

        tx.commit().await?;

        tracing::info!(
            booking_id = %booking.booking_id,
            status = %booking.payment_status,
            "Booking payment settled"
        );

        Ok(booking)
    }

    async fn lock_by_order(conn: &mut PgConnection, gateway_order_id: &str) -> Result<Booking> {
        sqlx::query_as::<_, Booking>(
            r#"
            SELECT booking_id, tournament_id, payer_kind, payer_id, user_id, amount, currency,
                   payment_status, gateway_order_id, gateway_payment_id, created_at, updated_at
            FROM bookings
            WHERE gateway_order_id = $1
            FOR UPDATE
            "#,
        )
        .bind(gateway_order_id)
        .fetch_optional(conn)
        .await?
        .ok_or(StorageError::NotFound)
    }
}
