use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DomainError;
use crate::models::{ParticipantKind, Tournament};

/// Direct (unpaid) registration needs an open window on a free tournament.
pub fn ensure_direct_registration(
    tournament: &Tournament,
    now: DateTime<Utc>,
) -> Result<(), DomainError> {
    if tournament.is_cancelled {
        return Err(DomainError::TournamentCancelled);
    }
    if !tournament.registration_open(now) {
        return Err(DomainError::RegistrationClosed);
    }
    if !tournament.is_free() {
        return Err(DomainError::PaymentRequired);
    }
    Ok(())
}

/// A match inside a tournament is played between two approved participants
/// of the kind the tournament registers.
pub fn ensure_match_participants(
    tournament: &Tournament,
    kind: ParticipantKind,
    participant_a: Uuid,
    participant_b: Uuid,
) -> Result<(), DomainError> {
    if tournament.is_cancelled {
        return Err(DomainError::TournamentCancelled);
    }
    if tournament.registration_type != kind {
        return Err(DomainError::RegistrationTypeMismatch {
            expected: tournament.registration_type,
        });
    }
    let roster = tournament.roster();
    if !roster.is_approved(participant_a) || !roster.is_approved(participant_b) {
        return Err(DomainError::NotApproved);
    }
    Ok(())
}

/// Registered and approved participants of a tournament.
///
/// Invariant: every approved id is also registered, and neither list holds
/// duplicates. All mutators keep it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticipantRoster {
    registered: Vec<Uuid>,
    approved: Vec<Uuid>,
}

impl ParticipantRoster {
    /// Builds a roster from stored lists, dropping duplicates and any approved
    /// id that is not registered.
    pub fn new(registered: Vec<Uuid>, approved: Vec<Uuid>) -> Self {
        let mut roster = Self::default();
        for id in registered {
            if !roster.registered.contains(&id) {
                roster.registered.push(id);
            }
        }
        for id in approved {
            if roster.registered.contains(&id) && !roster.approved.contains(&id) {
                roster.approved.push(id);
            }
        }
        roster
    }

    pub fn registered(&self) -> &[Uuid] {
        &self.registered
    }

    pub fn approved(&self) -> &[Uuid] {
        &self.approved
    }

    /// Registered but not yet approved, in registration order.
    pub fn pending(&self) -> Vec<Uuid> {
        self.registered
            .iter()
            .filter(|id| !self.approved.contains(id))
            .copied()
            .collect()
    }

    pub fn is_registered(&self, id: Uuid) -> bool {
        self.registered.contains(&id)
    }

    pub fn is_approved(&self, id: Uuid) -> bool {
        self.approved.contains(&id)
    }

    pub fn register(&mut self, id: Uuid, capacity: Option<usize>) -> Result<(), DomainError> {
        if self.is_registered(id) {
            return Err(DomainError::AlreadyRegistered);
        }
        if let Some(max) = capacity
            && self.registered.len() >= max
        {
            return Err(DomainError::CapacityReached(max));
        }
        self.registered.push(id);
        Ok(())
    }

    /// Approving an already approved participant is a no-op.
    pub fn approve(&mut self, id: Uuid) -> Result<(), DomainError> {
        if !self.is_registered(id) {
            return Err(DomainError::NotRegistered);
        }
        if !self.is_approved(id) {
            self.approved.push(id);
        }
        Ok(())
    }

    /// Rejecting drops the registration, and the approval with it.
    pub fn reject(&mut self, id: Uuid) -> Result<(), DomainError> {
        if !self.is_registered(id) {
            return Err(DomainError::NotRegistered);
        }
        self.registered.retain(|p| *p != id);
        self.approved.retain(|p| *p != id);
        Ok(())
    }

    pub fn withdraw(&mut self, id: Uuid) -> Result<(), DomainError> {
        self.reject(id)
    }

    pub fn is_consistent(&self) -> bool {
        self.approved.iter().all(|id| self.registered.contains(id))
    }

    pub fn into_parts(self) -> (Vec<Uuid>, Vec<Uuid>) {
        (self.registered, self.approved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn test_pending_is_registered_minus_approved() {
        let p = ids(4);
        let roster = ParticipantRoster::new(p.clone(), vec![p[1], p[3]]);
        assert_eq!(roster.pending(), vec![p[0], p[2]]);
    }

    #[test]
    fn test_new_drops_unregistered_approvals_and_duplicates() {
        let p = ids(3);
        let roster = ParticipantRoster::new(vec![p[0], p[0], p[1]], vec![p[1], p[2], p[1]]);
        assert_eq!(roster.registered(), &[p[0], p[1]]);
        assert_eq!(roster.approved(), &[p[1]]);
        assert!(roster.is_consistent());
    }

    #[test]
    fn test_register_twice_fails() {
        let p = ids(1);
        let mut roster = ParticipantRoster::default();
        roster.register(p[0], None).unwrap();
        assert_eq!(roster.register(p[0], None), Err(DomainError::AlreadyRegistered));
    }

    #[test]
    fn test_register_respects_capacity() {
        let p = ids(3);
        let mut roster = ParticipantRoster::default();
        roster.register(p[0], Some(2)).unwrap();
        roster.register(p[1], Some(2)).unwrap();
        assert_eq!(
            roster.register(p[2], Some(2)),
            Err(DomainError::CapacityReached(2))
        );
    }

    #[test]
    fn test_approve_requires_registration() {
        let mut roster = ParticipantRoster::default();
        assert_eq!(
            roster.approve(Uuid::new_v4()),
            Err(DomainError::NotRegistered)
        );
    }

    #[test]
    fn test_approve_is_idempotent() {
        let p = ids(1);
        let mut roster = ParticipantRoster::new(p.clone(), Vec::new());
        roster.approve(p[0]).unwrap();
        roster.approve(p[0]).unwrap();
        assert_eq!(roster.approved(), &[p[0]]);
        assert!(roster.pending().is_empty());
    }

    #[test]
    fn test_reject_removes_from_both_sets() {
        let p = ids(2);
        let mut roster = ParticipantRoster::new(p.clone(), p.clone());
        roster.reject(p[0]).unwrap();
        assert_eq!(roster.registered(), &[p[1]]);
        assert_eq!(roster.approved(), &[p[1]]);
        assert_eq!(roster.reject(p[0]), Err(DomainError::NotRegistered));
    }

    #[test]
    fn test_approved_stays_subset_across_operations() {
        let p = ids(5);
        let mut roster = ParticipantRoster::default();
        for id in &p {
            roster.register(*id, None).unwrap();
        }
        roster.approve(p[0]).unwrap();
        roster.approve(p[2]).unwrap();
        roster.reject(p[2]).unwrap();
        roster.withdraw(p[4]).unwrap();
        roster.approve(p[3]).unwrap();
        assert!(roster.is_consistent());
        assert_eq!(roster.approved(), &[p[0], p[3]]);
        assert_eq!(roster.pending(), vec![p[1]]);
    }

    fn team_tournament(registered: Vec<Uuid>, approved: Vec<Uuid>) -> Tournament {
        let now = chrono::Utc::now();
        Tournament {
            tournament_id: Uuid::new_v4(),
            name: "City Cup".to_string(),
            sport: "football".to_string(),
            organizer_id: Uuid::new_v4(),
            description: None,
            banner_url: None,
            registration_type: ParticipantKind::Team,
            registration_start: now - chrono::TimeDelta::days(10),
            registration_end: now - chrono::TimeDelta::days(1),
            start_date: now,
            end_date: now + chrono::TimeDelta::days(3),
            is_cancelled: false,
            entry_fee: rust_decimal::Decimal::ZERO,
            max_participants: None,
            registered_teams: registered,
            approved_teams: approved,
            registered_players: Vec::new(),
            approved_players: Vec::new(),
            created_at: now - chrono::TimeDelta::days(20),
        }
    }

    #[test]
    fn test_match_between_approved_teams() {
        let p = ids(2);
        let t = team_tournament(p.clone(), p.clone());
        assert_eq!(ensure_match_participants(&t, ParticipantKind::Team, p[0], p[1]), Ok(()));
    }

    #[test]
    fn test_match_needs_both_sides_approved() {
        let p = ids(3);
        let t = team_tournament(p.clone(), vec![p[0]]);

        assert_eq!(
            ensure_match_participants(&t, ParticipantKind::Team, p[0], p[1]),
            Err(DomainError::NotApproved)
        );
        let outsider = Uuid::new_v4();
        assert_eq!(
            ensure_match_participants(&t, ParticipantKind::Team, outsider, p[0]),
            Err(DomainError::NotApproved)
        );
    }

    #[test]
    fn test_match_kind_and_cancellation_checked_first() {
        let p = ids(2);
        let mut t = team_tournament(p.clone(), p.clone());
        assert_eq!(
            ensure_match_participants(&t, ParticipantKind::Player, p[0], p[1]),
            Err(DomainError::RegistrationTypeMismatch {
                expected: ParticipantKind::Team
            })
        );

        t.is_cancelled = true;
        assert_eq!(
            ensure_match_participants(&t, ParticipantKind::Team, p[0], p[1]),
            Err(DomainError::TournamentCancelled)
        );
    }
}
