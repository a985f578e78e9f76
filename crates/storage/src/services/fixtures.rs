use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::DomainError;
use crate::models::Tournament;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FixtureFormat {
    /// Everyone meets everyone once.
    #[default]
    RoundRobin,
    /// First round of a single-elimination bracket.
    Knockout,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFixture {
    pub round: i32,
    pub participant_a: Uuid,
    pub participant_b: Uuid,
    pub scheduled_at: DateTime<Utc>,
}

/// Fixtures are generated once, for a tournament that is still running.
pub fn ensure_can_generate(tournament: &Tournament, existing_matches: i64) -> Result<(), DomainError> {
    if tournament.is_cancelled {
        return Err(DomainError::TournamentCancelled);
    }
    if existing_matches > 0 {
        return Err(DomainError::FixturesExist);
    }
    Ok(())
}

/// Pairs `participants` into fixtures. Consecutive fixtures are `interval`
/// apart starting at `first_at`.
pub fn generate(
    format: FixtureFormat,
    participants: &[Uuid],
    first_at: DateTime<Utc>,
    interval: TimeDelta,
) -> Result<Vec<PlannedFixture>, DomainError> {
    if participants.len() < 2 {
        return Err(DomainError::NotEnoughParticipants(participants.len()));
    }

    let pairings = match format {
        FixtureFormat::RoundRobin => round_robin(participants),
        FixtureFormat::Knockout => knockout(participants),
    };

    Ok(pairings
        .into_iter()
        .zip(0i32..)
        .map(|((round, participant_a, participant_b), slot)| PlannedFixture {
            round,
            participant_a,
            participant_b,
            scheduled_at: first_at + interval * slot,
        })
        .collect())
}

/// Circle method: the first seat stays put while the others rotate one seat
/// per round. An odd field gets an empty seat, and whoever faces it sits out.
fn round_robin(participants: &[Uuid]) -> Vec<(i32, Uuid, Uuid)> {
    let mut seats: Vec<Option<Uuid>> = participants.iter().copied().map(Some).collect();
    if seats.len() % 2 == 1 {
        seats.push(None);
    }

    let n = seats.len();
    let mut pairings = Vec::with_capacity(n * (n - 1) / 2);

    for round in 1..n as i32 {
        for i in 0..n / 2 {
            if let (Some(a), Some(b)) = (seats[i], seats[n - 1 - i]) {
                pairings.push((round, a, b));
            }
        }
        seats[1..].rotate_right(1);
    }

    pairings
}

/// Adjacent pairs in seeding order; a trailing odd participant gets a bye.
fn knockout(participants: &[Uuid]) -> Vec<(i32, Uuid, Uuid)> {
    participants
        .chunks_exact(2)
        .map(|pair| (1, pair[0], pair[1]))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::TimeZone;

    use super::*;

    fn ids(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 1, 9, 0, 0).unwrap()
    }

    fn tournament() -> Tournament {
        Tournament {
            tournament_id: Uuid::new_v4(),
            name: "Autumn League".to_string(),
            sport: "hockey".to_string(),
            organizer_id: Uuid::new_v4(),
            description: None,
            banner_url: None,
            registration_type: crate::models::ParticipantKind::Team,
            registration_start: start() - TimeDelta::days(30),
            registration_end: start() - TimeDelta::days(1),
            start_date: start(),
            end_date: start() + TimeDelta::days(10),
            is_cancelled: false,
            entry_fee: rust_decimal::Decimal::ZERO,
            max_participants: None,
            registered_teams: Vec::new(),
            approved_teams: Vec::new(),
            registered_players: Vec::new(),
            approved_players: Vec::new(),
            created_at: start() - TimeDelta::days(60),
        }
    }

    fn unordered(a: Uuid, b: Uuid) -> (Uuid, Uuid) {
        if a < b { (a, b) } else { (b, a) }
    }

    #[test]
    fn test_round_robin_every_pair_once() {
        for n in 2..=9 {
            let p = ids(n);
            let fixtures =
                generate(FixtureFormat::RoundRobin, &p, start(), TimeDelta::hours(2)).unwrap();
            assert_eq!(fixtures.len(), n * (n - 1) / 2, "n = {n}");

            let pairs: HashSet<_> = fixtures
                .iter()
                .map(|f| unordered(f.participant_a, f.participant_b))
                .collect();
            assert_eq!(pairs.len(), fixtures.len(), "duplicate pairing for n = {n}");
            assert!(fixtures.iter().all(|f| f.participant_a != f.participant_b));
        }
    }

    #[test]
    fn test_round_robin_nobody_plays_twice_in_a_round() {
        let p = ids(6);
        let fixtures = generate(FixtureFormat::RoundRobin, &p, start(), TimeDelta::hours(1)).unwrap();
        for round in 1..=5 {
            let mut seen = HashSet::new();
            for f in fixtures.iter().filter(|f| f.round == round) {
                assert!(seen.insert(f.participant_a));
                assert!(seen.insert(f.participant_b));
            }
            assert_eq!(seen.len(), 6);
        }
    }

    #[test]
    fn test_knockout_pairs_in_order_with_bye() {
        let p = ids(5);
        let fixtures = generate(FixtureFormat::Knockout, &p, start(), TimeDelta::hours(1)).unwrap();
        assert_eq!(fixtures.len(), 2);
        assert_eq!((fixtures[0].participant_a, fixtures[0].participant_b), (p[0], p[1]));
        assert_eq!((fixtures[1].participant_a, fixtures[1].participant_b), (p[2], p[3]));
        assert!(fixtures.iter().all(|f| f.round == 1));
    }

    #[test]
    fn test_fixtures_are_spaced_by_interval() {
        let p = ids(4);
        let fixtures = generate(FixtureFormat::Knockout, &p, start(), TimeDelta::minutes(90)).unwrap();
        assert_eq!(fixtures[0].scheduled_at, start());
        assert_eq!(fixtures[1].scheduled_at, start() + TimeDelta::minutes(90));
    }

    #[test]
    fn test_needs_two_participants() {
        assert_eq!(
            generate(FixtureFormat::RoundRobin, &ids(1), start(), TimeDelta::hours(1)),
            Err(DomainError::NotEnoughParticipants(1))
        );
        assert_eq!(
            generate(FixtureFormat::Knockout, &[], start(), TimeDelta::hours(1)),
            Err(DomainError::NotEnoughParticipants(0))
        );
    }

    #[test]
    fn test_generation_needs_an_empty_schedule() {
        let t = tournament();
        assert_eq!(ensure_can_generate(&t, 0), Ok(()));
        assert_eq!(ensure_can_generate(&t, 1), Err(DomainError::FixturesExist));
    }

    #[test]
    fn test_cancelled_tournament_gets_no_fixtures() {
        let mut t = tournament();
        t.is_cancelled = true;
        assert_eq!(ensure_can_generate(&t, 0), Err(DomainError::TournamentCancelled));
    }
}
