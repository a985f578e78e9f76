use thiserror::Error;

use crate::models::{ParticipantKind, PaymentStatus, RequestStatus};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if e.code().as_deref() == Some("23505")
        )
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if e.code().as_deref() == Some("23503")
        )
    }

    /// Maps unique and foreign key violations onto `ConstraintViolation` with
    /// a caller supplied message, leaving every other error untouched.
    pub fn or_constraint(self, unique_msg: &str, foreign_key_msg: &str) -> Self {
        if self.is_unique_violation() {
            StorageError::ConstraintViolation(unique_msg.to_string())
        } else if self.is_foreign_key_violation() {
            StorageError::ConstraintViolation(foreign_key_msg.to_string())
        } else {
            self
        }
    }
}

/// Rule violations raised by the pure domain services.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Forbidden: {0}")]
    Forbidden(&'static str),

    #[error("Request is already {0} and can no longer change")]
    RequestClosed(RequestStatus),

    #[error("A pending request already exists for this player and team")]
    DuplicateRequest,

    #[error("Invalid request: {0}")]
    InvalidRequest(&'static str),

    #[error("Player is already on the team roster")]
    AlreadyOnRoster,

    #[error("Registration is closed for this tournament")]
    RegistrationClosed,

    #[error("Tournament only accepts {expected} registrations")]
    RegistrationTypeMismatch { expected: ParticipantKind },

    #[error("Participant is already registered")]
    AlreadyRegistered,

    #[error("Participant is not registered for this tournament")]
    NotRegistered,

    #[error("Tournament is full ({0} participants)")]
    CapacityReached(usize),

    #[error("Tournament is cancelled")]
    TournamentCancelled,

    #[error("At least two approved participants are required, found {0}")]
    NotEnoughParticipants(usize),

    #[error("Fixtures have already been generated for this tournament")]
    FixturesExist,

    #[error("Match is cancelled")]
    MatchCancelled,

    #[error("Match is completed")]
    MatchCompleted,

    #[error("Participant is not approved for this tournament")]
    NotApproved,

    #[error("Booking payment is already {0}")]
    PaymentClosed(PaymentStatus),

    #[error("A booking for this participant is already awaiting payment")]
    BookingInProgress,

    #[error("Tournament has no entry fee, register directly")]
    FreeTournament,

    #[error("Tournament requires payment of the entry fee")]
    PaymentRequired,
}

/// Coarse classification used by the HTTP layer to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainErrorKind {
    Forbidden,
    Conflict,
    Invalid,
}

impl DomainError {
    pub fn kind(&self) -> DomainErrorKind {
        match self {
            Self::Forbidden(_) => DomainErrorKind::Forbidden,
            Self::InvalidRequest(_)
            | Self::RegistrationTypeMismatch { .. }
            | Self::NotRegistered
            | Self::NotApproved
            | Self::NotEnoughParticipants(_)
            | Self::FreeTournament
            | Self::PaymentRequired => DomainErrorKind::Invalid,
            Self::RequestClosed(_)
            | Self::DuplicateRequest
            | Self::AlreadyOnRoster
            | Self::RegistrationClosed
            | Self::AlreadyRegistered
            | Self::CapacityReached(_)
            | Self::TournamentCancelled
            | Self::FixturesExist
            | Self::MatchCancelled
            | Self::MatchCompleted
            | Self::BookingInProgress
            | Self::PaymentClosed(_) => DomainErrorKind::Conflict,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_request_is_conflict() {
        let err = DomainError::RequestClosed(RequestStatus::Accepted);
        assert_eq!(err.kind(), DomainErrorKind::Conflict);
        assert_eq!(
            err.to_string(),
            "Request is already ACCEPTED and can no longer change"
        );
    }

    #[test]
    fn test_forbidden_kind() {
        assert_eq!(
            DomainError::Forbidden("only the receiver can accept").kind(),
            DomainErrorKind::Forbidden
        );
    }

    #[test]
    fn test_type_mismatch_message_names_expected_kind() {
        let err = DomainError::RegistrationTypeMismatch {
            expected: ParticipantKind::Team,
        };
        assert_eq!(err.kind(), DomainErrorKind::Invalid);
        assert_eq!(err.to_string(), "Tournament only accepts TEAM registrations");
    }

    #[test]
    fn test_finished_match_is_conflict() {
        assert_eq!(DomainError::MatchCompleted.kind(), DomainErrorKind::Conflict);
        assert_eq!(DomainError::NotApproved.kind(), DomainErrorKind::Invalid);
    }

    #[test]
    fn test_not_found_display() {
        assert_eq!(StorageError::NotFound.to_string(), "Not found");
    }
}
