use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;
use crate::models::{Request, RequestStatus, RequestType, Role, Team, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestAction {
    Accept,
    Reject,
    Cancel,
}

impl RequestAction {
    pub fn target(self) -> RequestStatus {
        match self {
            Self::Accept => RequestStatus::Accepted,
            Self::Reject => RequestStatus::Rejected,
            Self::Cancel => RequestStatus::Cancelled,
        }
    }
}

/// Checks that `sender` may open a request of `request_type` towards
/// `receiver` about `team`.
pub fn validate_new_request(
    sender: &User,
    receiver: &User,
    team: &Team,
    request_type: RequestType,
) -> Result<(), DomainError> {
    if sender.user_id == receiver.user_id {
        return Err(DomainError::InvalidRequest(
            "sender and receiver must be different users",
        ));
    }

    match request_type {
        RequestType::PlayerToTeam => {
            if sender.role != Role::Player {
                return Err(DomainError::InvalidRequest(
                    "only players can ask to join a team",
                ));
            }
            if receiver.user_id != team.manager_id {
                return Err(DomainError::InvalidRequest(
                    "join requests must be addressed to the team manager",
                ));
            }
            if team.has_player(sender.user_id) {
                return Err(DomainError::AlreadyOnRoster);
            }
        }
        RequestType::TeamToPlayer => {
            if sender.user_id != team.manager_id {
                return Err(DomainError::Forbidden(
                    "only the team manager can invite players",
                ));
            }
            if receiver.role != Role::Player {
                return Err(DomainError::InvalidRequest("only players can be invited"));
            }
            if team.has_player(receiver.user_id) {
                return Err(DomainError::AlreadyOnRoster);
            }
        }
    }

    Ok(())
}

/// Refuses a new request while another one about the same player and team is
/// still PENDING, whichever side sent it.
pub fn ensure_no_open_request(
    player_id: Uuid,
    team_id: Uuid,
    existing: &[Request],
) -> Result<(), DomainError> {
    let open = existing.iter().any(|r| {
        r.status == RequestStatus::Pending && r.team_id == team_id && r.player_id() == player_id
    });
    if open {
        return Err(DomainError::DuplicateRequest);
    }
    Ok(())
}

/// Computes the status `request` moves to when `actor_id` performs `action`.
///
/// The receiver accepts or rejects, the sender cancels, and only a PENDING
/// request moves at all.
pub fn transition(
    request: &Request,
    actor_id: Uuid,
    action: RequestAction,
) -> Result<RequestStatus, DomainError> {
    match action {
        RequestAction::Accept | RequestAction::Reject if actor_id != request.receiver_id => {
            return Err(DomainError::Forbidden(
                "only the receiver can accept or reject a request",
            ));
        }
        RequestAction::Cancel if actor_id != request.sender_id => {
            return Err(DomainError::Forbidden("only the sender can cancel a request"));
        }
        _ => {}
    }

    if request.status.is_terminal() {
        return Err(DomainError::RequestClosed(request.status));
    }

    Ok(action.target())
}

/// Roster side effect of an accepted request. Returns whether the roster changed.
pub fn apply_acceptance(team: &mut Team, request: &Request) -> bool {
    team.add_player(request.player_id())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn user(role: Role) -> User {
        User {
            user_id: Uuid::new_v4(),
            name: "someone".to_string(),
            email: format!("{}@example.com", Uuid::new_v4()),
            role,
            avatar_url: None,
            created_at: Utc::now(),
        }
    }

    fn team_managed_by(manager: &User) -> Team {
        Team {
            team_id: Uuid::new_v4(),
            name: "Riverside".to_string(),
            sport: "cricket".to_string(),
            manager_id: manager.user_id,
            players: Vec::new(),
            logo_url: None,
            created_at: Utc::now(),
        }
    }

    fn request(sender: &User, receiver: &User, team: &Team, request_type: RequestType) -> Request {
        Request {
            request_id: Uuid::new_v4(),
            sender_id: sender.user_id,
            receiver_id: receiver.user_id,
            team_id: team.team_id,
            request_type,
            status: RequestStatus::Pending,
            message: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_receiver_accepts_pending() {
        let player = user(Role::Player);
        let manager = user(Role::TeamManager);
        let team = team_managed_by(&manager);
        let req = request(&player, &manager, &team, RequestType::PlayerToTeam);

        assert_eq!(
            transition(&req, manager.user_id, RequestAction::Accept),
            Ok(RequestStatus::Accepted)
        );
        assert_eq!(
            transition(&req, manager.user_id, RequestAction::Reject),
            Ok(RequestStatus::Rejected)
        );
    }

    #[test]
    fn test_sender_cannot_accept() {
        let player = user(Role::Player);
        let manager = user(Role::TeamManager);
        let team = team_managed_by(&manager);
        let req = request(&player, &manager, &team, RequestType::PlayerToTeam);

        assert!(matches!(
            transition(&req, player.user_id, RequestAction::Accept),
            Err(DomainError::Forbidden(_))
        ));
    }

    #[test]
    fn test_receiver_cannot_cancel() {
        let player = user(Role::Player);
        let manager = user(Role::TeamManager);
        let team = team_managed_by(&manager);
        let req = request(&manager, &player, &team, RequestType::TeamToPlayer);

        assert!(matches!(
            transition(&req, player.user_id, RequestAction::Cancel),
            Err(DomainError::Forbidden(_))
        ));
        assert_eq!(
            transition(&req, manager.user_id, RequestAction::Cancel),
            Ok(RequestStatus::Cancelled)
        );
    }

    #[test]
    fn test_terminal_states_never_move() {
        let player = user(Role::Player);
        let manager = user(Role::TeamManager);
        let team = team_managed_by(&manager);
        let mut req = request(&player, &manager, &team, RequestType::PlayerToTeam);

        for terminal in [
            RequestStatus::Accepted,
            RequestStatus::Rejected,
            RequestStatus::Cancelled,
        ] {
            req.status = terminal;
            assert_eq!(
                transition(&req, player.user_id, RequestAction::Cancel),
                Err(DomainError::RequestClosed(terminal))
            );
            for action in [RequestAction::Accept, RequestAction::Reject] {
                assert_eq!(
                    transition(&req, manager.user_id, action),
                    Err(DomainError::RequestClosed(terminal))
                );
            }
        }
    }

    #[test]
    fn test_acceptance_adds_player_for_both_directions() {
        let player = user(Role::Player);
        let manager = user(Role::TeamManager);
        let mut team = team_managed_by(&manager);

        let join = request(&player, &manager, &team, RequestType::PlayerToTeam);
        assert!(apply_acceptance(&mut team, &join));
        assert_eq!(team.players, vec![player.user_id]);

        let invite = request(&manager, &player, &team, RequestType::TeamToPlayer);
        assert!(!apply_acceptance(&mut team, &invite));
        assert_eq!(team.players, vec![player.user_id]);
    }

    #[test]
    fn test_second_pending_join_request_refused() {
        let player = user(Role::Player);
        let manager = user(Role::TeamManager);
        let team = team_managed_by(&manager);
        let join = request(&player, &manager, &team, RequestType::PlayerToTeam);

        assert_eq!(
            ensure_no_open_request(player.user_id, team.team_id, &[join]),
            Err(DomainError::DuplicateRequest)
        );
    }

    #[test]
    fn test_invite_refused_while_join_request_pending() {
        let player = user(Role::Player);
        let manager = user(Role::TeamManager);
        let team = team_managed_by(&manager);
        let join = request(&player, &manager, &team, RequestType::PlayerToTeam);

        let invited = RequestType::TeamToPlayer.player_of(manager.user_id, player.user_id);
        assert_eq!(invited, player.user_id);
        assert_eq!(
            ensure_no_open_request(invited, team.team_id, std::slice::from_ref(&join)),
            Err(DomainError::DuplicateRequest)
        );

        let invite = request(&manager, &player, &team, RequestType::TeamToPlayer);
        assert_eq!(
            ensure_no_open_request(player.user_id, team.team_id, &[invite]),
            Err(DomainError::DuplicateRequest)
        );
    }

    #[test]
    fn test_closed_or_unrelated_requests_do_not_block() {
        let player = user(Role::Player);
        let other_player = user(Role::Player);
        let manager = user(Role::TeamManager);
        let team = team_managed_by(&manager);
        let other_team = team_managed_by(&manager);

        let mut rejected = request(&player, &manager, &team, RequestType::PlayerToTeam);
        rejected.status = RequestStatus::Rejected;
        let elsewhere = request(&player, &manager, &other_team, RequestType::PlayerToTeam);
        let someone_else = request(&manager, &other_player, &team, RequestType::TeamToPlayer);

        assert_eq!(
            ensure_no_open_request(
                player.user_id,
                team.team_id,
                &[rejected, elsewhere, someone_else]
            ),
            Ok(())
        );
    }

    #[test]
    fn test_join_request_must_target_manager() {
        let player = user(Role::Player);
        let manager = user(Role::TeamManager);
        let stranger = user(Role::TeamManager);
        let team = team_managed_by(&manager);

        assert!(validate_new_request(&player, &manager, &team, RequestType::PlayerToTeam).is_ok());
        assert!(matches!(
            validate_new_request(&player, &stranger, &team, RequestType::PlayerToTeam),
            Err(DomainError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_invite_requires_manager_and_player() {
        let player = user(Role::Player);
        let organizer = user(Role::Organizer);
        let manager = user(Role::TeamManager);
        let team = team_managed_by(&manager);

        assert!(validate_new_request(&manager, &player, &team, RequestType::TeamToPlayer).is_ok());
        assert!(matches!(
            validate_new_request(&organizer, &player, &team, RequestType::TeamToPlayer),
            Err(DomainError::Forbidden(_))
        ));
        assert!(matches!(
            validate_new_request(&manager, &organizer, &team, RequestType::TeamToPlayer),
            Err(DomainError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_rostered_player_cannot_be_targeted() {
        let player = user(Role::Player);
        let manager = user(Role::TeamManager);
        let mut team = team_managed_by(&manager);
        team.add_player(player.user_id);

        assert_eq!(
            validate_new_request(&player, &manager, &team, RequestType::PlayerToTeam),
            Err(DomainError::AlreadyOnRoster)
        );
        assert_eq!(
            validate_new_request(&manager, &player, &team, RequestType::TeamToPlayer),
            Err(DomainError::AlreadyOnRoster)
        );
    }
}
