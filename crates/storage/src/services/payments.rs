use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DomainError;
use crate::models::{Booking, PaymentStatus, Tournament};
use crate::services::participants::ParticipantRoster;

/// Reference handed to the payment gateway when checkout starts.
pub fn order_reference(booking_id: Uuid) -> String {
    format!("order_{}", booking_id.simple())
}

/// A booking can only be opened for a paid tournament that is taking
/// registrations.
pub fn ensure_bookable(tournament: &Tournament, now: DateTime<Utc>) -> Result<(), DomainError> {
    if tournament.is_cancelled {
        return Err(DomainError::TournamentCancelled);
    }
    if tournament.is_free() {
        return Err(DomainError::FreeTournament);
    }
    if !tournament.registration_open(now) {
        return Err(DomainError::RegistrationClosed);
    }
    Ok(())
}

/// Outcome of the gateway completion callback. Only PENDING bookings settle.
pub fn settle(booking: &Booking, success: bool) -> Result<PaymentStatus, DomainError> {
    if booking.payment_status != PaymentStatus::Pending {
        return Err(DomainError::PaymentClosed(booking.payment_status));
    }
    Ok(if success {
        PaymentStatus::Paid
    } else {
        PaymentStatus::Failed
    })
}

/// Roster side effect of a PAID booking. Returns whether the payer was added;
/// an error means the payment was taken but the payer could not be entered.
pub fn apply_payment(
    tournament: &Tournament,
    roster: &mut ParticipantRoster,
    payer_id: Uuid,
) -> Result<bool, DomainError> {
    if tournament.is_cancelled {
        return Err(DomainError::TournamentCancelled);
    }
    match roster.register(payer_id, tournament.capacity()) {
        Ok(()) => Ok(true),
        Err(DomainError::AlreadyRegistered) => Ok(false),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::models::ParticipantKind;

    fn booking(status: PaymentStatus) -> Booking {
        let booking_id = Uuid::new_v4();
        Booking {
            booking_id,
            tournament_id: Uuid::new_v4(),
            payer_kind: ParticipantKind::Player,
            payer_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            amount: Decimal::new(50000, 2),
            currency: "INR".to_string(),
            payment_status: status,
            gateway_order_id: order_reference(booking_id),
            gateway_payment_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn paid_tournament(max_participants: Option<i32>) -> Tournament {
        let now = Utc::now();
        Tournament {
            tournament_id: Uuid::new_v4(),
            name: "Open Singles".to_string(),
            sport: "badminton".to_string(),
            organizer_id: Uuid::new_v4(),
            description: None,
            banner_url: None,
            registration_type: ParticipantKind::Player,
            registration_start: now - chrono::TimeDelta::days(1),
            registration_end: now + chrono::TimeDelta::days(1),
            start_date: now + chrono::TimeDelta::days(7),
            end_date: now + chrono::TimeDelta::days(8),
            is_cancelled: false,
            entry_fee: Decimal::new(50000, 2),
            max_participants,
            registered_teams: Vec::new(),
            approved_teams: Vec::new(),
            registered_players: Vec::new(),
            approved_players: Vec::new(),
            created_at: now,
        }
    }

    #[test]
    fn test_paid_booking_registers_payer() {
        let t = paid_tournament(None);
        let payer = Uuid::new_v4();
        let mut roster = t.roster();

        assert_eq!(apply_payment(&t, &mut roster, payer), Ok(true));
        assert!(roster.is_registered(payer));
        assert!(!roster.is_approved(payer));

        assert_eq!(apply_payment(&t, &mut roster, payer), Ok(false));
        assert_eq!(roster.registered().len(), 1);
    }

    #[test]
    fn test_payment_after_cancellation_leaves_roster_alone() {
        let mut t = paid_tournament(None);
        t.is_cancelled = true;
        let mut roster = t.roster();

        assert_eq!(
            apply_payment(&t, &mut roster, Uuid::new_v4()),
            Err(DomainError::TournamentCancelled)
        );
        assert!(roster.registered().is_empty());
    }

    #[test]
    fn test_payment_into_full_tournament_is_refused() {
        let mut t = paid_tournament(Some(1));
        t.registered_players = vec![Uuid::new_v4()];
        let mut roster = t.roster();

        assert_eq!(
            apply_payment(&t, &mut roster, Uuid::new_v4()),
            Err(DomainError::CapacityReached(1))
        );
        assert_eq!(roster.registered().len(), 1);
    }

    #[test]
    fn test_settle_pending() {
        assert_eq!(settle(&booking(PaymentStatus::Pending), true), Ok(PaymentStatus::Paid));
        assert_eq!(settle(&booking(PaymentStatus::Pending), false), Ok(PaymentStatus::Failed));
    }

    #[test]
    fn test_settled_booking_is_closed() {
        for status in [PaymentStatus::Paid, PaymentStatus::Failed, PaymentStatus::Refunded] {
            assert_eq!(
                settle(&booking(status), true),
                Err(DomainError::PaymentClosed(status))
            );
        }
    }

    #[test]
    fn test_order_reference_fits_column() {
        let reference = order_reference(Uuid::new_v4());
        assert!(reference.starts_with("order_"));
        assert!(reference.len() <= 64);
    }
}
