use crate::error::DomainError;
use crate::models::{Match, MatchStatus};

/// The persisted status only reaches CANCELLED through `cancel` and
/// COMPLETED through a recorded result. Both are final for edits.
pub fn ensure_editable(game: &Match) -> Result<(), DomainError> {
    if game.is_cancelled || game.status == MatchStatus::Cancelled {
        return Err(DomainError::MatchCancelled);
    }
    if game.status == MatchStatus::Completed {
        return Err(DomainError::MatchCompleted);
    }
    Ok(())
}

/// A completed match keeps its result, so it cannot be cancelled afterwards.
pub fn ensure_cancellable(game: &Match) -> Result<(), DomainError> {
    ensure_editable(game)
}

/// Results can be recorded again on a completed match to correct the score.
pub fn ensure_scorable(game: &Match) -> Result<(), DomainError> {
    if game.is_cancelled || game.status == MatchStatus::Cancelled {
        return Err(DomainError::MatchCancelled);
    }
    Ok(())
}
