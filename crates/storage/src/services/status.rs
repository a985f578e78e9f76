use chrono::{DateTime, TimeDelta, Utc};

use crate::models::{Match, MatchStatus, Tournament, TournamentStatus};

/// How long a match is considered to be in progress after kick-off.
///
/// Applies to every sport alike.
pub const MATCH_DURATION_HOURS: i64 = 3;

pub fn match_duration() -> TimeDelta {
    TimeDelta::hours(MATCH_DURATION_HOURS)
}

/// Status of a match as seen at `now`.
///
/// Cancellation wins over everything. Otherwise the match is live from
/// `scheduled_at` (inclusive) until `scheduled_at + MATCH_DURATION_HOURS`
/// (inclusive) and completed afterwards.
pub fn derive_match_status(
    is_cancelled: bool,
    scheduled_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> MatchStatus {
    if is_cancelled {
        return MatchStatus::Cancelled;
    }

    let ends_at = scheduled_at + match_duration();
    if now > ends_at {
        MatchStatus::Completed
    } else if now >= scheduled_at {
        MatchStatus::Live
    } else {
        MatchStatus::Scheduled
    }
}

/// Status of a tournament as seen at `now`, over the window `[start, end]`.
pub fn derive_tournament_status(
    is_cancelled: bool,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    now: DateTime<Utc>,
) -> TournamentStatus {
    if is_cancelled {
        TournamentStatus::Cancelled
    } else if now > end {
        TournamentStatus::Completed
    } else if now >= start {
        TournamentStatus::Live
    } else {
        TournamentStatus::Upcoming
    }
}

pub fn registration_open(tournament: &Tournament, now: DateTime<Utc>) -> bool {
    !tournament.is_cancelled
        && now >= tournament.registration_start
        && now <= tournament.registration_end
}

impl Match {
    pub fn derived_status(&self, now: DateTime<Utc>) -> MatchStatus {
        derive_match_status(self.is_cancelled, self.scheduled_at, now)
    }
}

impl Tournament {
    pub fn derived_status(&self, now: DateTime<Utc>) -> TournamentStatus {
        derive_tournament_status(self.is_cancelled, self.start_date, self.end_date, now)
    }

    pub fn registration_open(&self, now: DateTime<Utc>) -> bool {
        registration_open(self, now)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use super::*;
    use crate::models::ParticipantKind;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 14, 18, 0, 0).unwrap()
    }

    fn tournament(start: DateTime<Utc>, end: DateTime<Utc>) -> Tournament {
        Tournament {
            tournament_id: Uuid::new_v4(),
            name: "Summer Cup".to_string(),
            sport: "football".to_string(),
            organizer_id: Uuid::new_v4(),
            description: None,
            banner_url: None,
            registration_type: ParticipantKind::Team,
            registration_start: start - TimeDelta::days(30),
            registration_end: start - TimeDelta::days(1),
            start_date: start,
            end_date: end,
            is_cancelled: false,
            entry_fee: Decimal::ZERO,
            max_participants: None,
            registered_teams: Vec::new(),
            approved_teams: Vec::new(),
            registered_players: Vec::new(),
            approved_players: Vec::new(),
            created_at: start - TimeDelta::days(60),
        }
    }

    #[test]
    fn test_cancelled_match_ignores_timestamps() {
        for offset in [-10, -1, 0, 1, 10] {
            let scheduled = now() + TimeDelta::hours(offset);
            assert_eq!(
                derive_match_status(true, scheduled, now()),
                MatchStatus::Cancelled
            );
        }
    }

    #[test]
    fn test_match_live_at_kickoff() {
        assert_eq!(derive_match_status(false, now(), now()), MatchStatus::Live);
    }

    #[test]
    fn test_match_live_one_hour_in() {
        let scheduled = now() - TimeDelta::hours(1);
        assert_eq!(
            derive_match_status(false, scheduled, now()),
            MatchStatus::Live
        );
    }

    #[test]
    fn test_match_completed_after_four_hours() {
        let scheduled = now() - TimeDelta::hours(4);
        assert_eq!(
            derive_match_status(false, scheduled, now()),
            MatchStatus::Completed
        );
    }

    #[test]
    fn test_match_live_at_exact_end_of_window() {
        let scheduled = now() - match_duration();
        assert_eq!(
            derive_match_status(false, scheduled, now()),
            MatchStatus::Live
        );
        let scheduled = scheduled - TimeDelta::seconds(1);
        assert_eq!(
            derive_match_status(false, scheduled, now()),
            MatchStatus::Completed
        );
    }

    #[test]
    fn test_match_scheduled_before_kickoff() {
        let scheduled = now() + TimeDelta::minutes(5);
        assert_eq!(
            derive_match_status(false, scheduled, now()),
            MatchStatus::Scheduled
        );
    }

    #[test]
    fn test_tournament_completed_after_end() {
        let t = tournament(now() - TimeDelta::days(5), now() - TimeDelta::seconds(1));
        assert_eq!(t.derived_status(now()), TournamentStatus::Completed);
    }

    #[test]
    fn test_tournament_window_is_inclusive() {
        let t = tournament(now(), now() + TimeDelta::days(2));
        assert_eq!(t.derived_status(now()), TournamentStatus::Live);

        let t = tournament(now() - TimeDelta::days(2), now());
        assert_eq!(t.derived_status(now()), TournamentStatus::Live);
    }

    #[test]
    fn test_tournament_upcoming_and_cancelled() {
        let mut t = tournament(now() + TimeDelta::days(1), now() + TimeDelta::days(3));
        assert_eq!(t.derived_status(now()), TournamentStatus::Upcoming);

        t.is_cancelled = true;
        assert_eq!(t.derived_status(now()), TournamentStatus::Cancelled);
    }

    #[test]
    fn test_registration_window() {
        let mut t = tournament(now() + TimeDelta::days(7), now() + TimeDelta::days(9));
        assert!(t.registration_open(now()));
        assert!(!t.registration_open(t.registration_end + TimeDelta::seconds(1)));
        assert!(!t.registration_open(t.registration_start - TimeDelta::seconds(1)));

        t.is_cancelled = true;
        assert!(!t.registration_open(now()));
    }
}
