use uuid::Uuid;

use crate::error::DomainError;
use crate::models::{ParticipantKind, Role, Team, Tournament, User};

pub fn ensure_role(user: &User, allowed: &[Role], reason: &'static str) -> Result<(), DomainError> {
    if user.is_admin() || allowed.contains(&user.role) {
        Ok(())
    } else {
        Err(DomainError::Forbidden(reason))
    }
}

pub fn ensure_self_or_admin(user: &User, target_id: Uuid) -> Result<(), DomainError> {
    if user.is_admin() || user.user_id == target_id {
        Ok(())
    } else {
        Err(DomainError::Forbidden("you can only change your own account"))
    }
}

pub fn ensure_tournament_organizer(user: &User, tournament: &Tournament) -> Result<(), DomainError> {
    if user.is_admin() || tournament.organizer_id == user.user_id {
        Ok(())
    } else {
        Err(DomainError::Forbidden(
            "only the tournament organizer can do this",
        ))
    }
}

pub fn ensure_team_manager(user: &User, team: &Team) -> Result<(), DomainError> {
    if user.is_admin() || team.manager_id == user.user_id {
        Ok(())
    } else {
        Err(DomainError::Forbidden("only the team manager can do this"))
    }
}

/// Matches inside a tournament belong to its organizer; standalone matches
/// can be run by any organizer.
pub fn ensure_match_organizer(user: &User, tournament: Option<&Tournament>) -> Result<(), DomainError> {
    match tournament {
        Some(t) => ensure_tournament_organizer(user, t),
        None => ensure_role(user, &[Role::Organizer], "only organizers can manage matches"),
    }
}

/// The participant id `user` registers with: their own id for player
/// tournaments, the team they manage for team tournaments.
pub fn resolve_participant(
    user: &User,
    registration_type: ParticipantKind,
    team: Option<&Team>,
) -> Result<Uuid, DomainError> {
    match (registration_type, team) {
        (ParticipantKind::Player, Some(_)) | (ParticipantKind::Team, None) => {
            Err(DomainError::RegistrationTypeMismatch {
                expected: registration_type,
            })
        }
        (ParticipantKind::Player, None) => {
            if user.role == Role::Player {
                Ok(user.user_id)
            } else {
                Err(DomainError::Forbidden(
                    "only players can register for player tournaments",
                ))
            }
        }
        (ParticipantKind::Team, Some(team)) => {
            ensure_team_manager(user, team)?;
            Ok(team.team_id)
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn user(role: Role) -> User {
        User {
            user_id: Uuid::new_v4(),
            name: "u".to_string(),
            email: "u@example.com".to_string(),
            role,
            avatar_url: None,
            created_at: Utc::now(),
        }
    }

    fn team(manager: &User) -> Team {
        Team {
            team_id: Uuid::new_v4(),
            name: "Eagles".to_string(),
            sport: "basketball".to_string(),
            manager_id: manager.user_id,
            players: Vec::new(),
            logo_url: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_admin_passes_role_checks() {
        let admin = user(Role::Admin);
        assert!(ensure_role(&admin, &[Role::Organizer], "nope").is_ok());
        assert!(ensure_self_or_admin(&admin, Uuid::new_v4()).is_ok());
    }

    #[test]
    fn test_player_registers_as_self() {
        let player = user(Role::Player);
        assert_eq!(
            resolve_participant(&player, ParticipantKind::Player, None),
            Ok(player.user_id)
        );
    }

    #[test]
    fn test_manager_registers_own_team_only() {
        let manager = user(Role::TeamManager);
        let other = user(Role::TeamManager);
        let own = team(&manager);
        let foreign = team(&other);

        assert_eq!(
            resolve_participant(&manager, ParticipantKind::Team, Some(&own)),
            Ok(own.team_id)
        );
        assert!(matches!(
            resolve_participant(&manager, ParticipantKind::Team, Some(&foreign)),
            Err(DomainError::Forbidden(_))
        ));
    }

    #[test]
    fn test_registration_type_mismatch() {
        let manager = user(Role::TeamManager);
        let own = team(&manager);
        assert_eq!(
            resolve_participant(&manager, ParticipantKind::Player, Some(&own)),
            Err(DomainError::RegistrationTypeMismatch {
                expected: ParticipantKind::Player
            })
        );
        assert_eq!(
            resolve_participant(&manager, ParticipantKind::Team, None),
            Err(DomainError::RegistrationTypeMismatch {
                expected: ParticipantKind::Team
            })
        );
    }
}
