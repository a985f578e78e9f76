use chrono::{DateTime, Utc};
use sqlx::PgPool;
use storage::{
    dto::{
        matches::MatchFilter,
        tournament::{
            CreateTournamentRequest, GenerateFixturesRequest, TournamentFilter,
            UpdateTournamentRequest,
        },
    },
    error::{DomainError, Result},
    models::{Match, Role, Tournament, User},
    repository::{
        matches::MatchRepository, settings::SettingsRepository, team::TeamRepository,
        tournament::TournamentRepository,
    },
    services::{access, participants},
};
use uuid::Uuid;

pub async fn list_tournaments(
    pool: &PgPool,
    filter: &TournamentFilter,
    now: DateTime<Utc>,
) -> Result<Vec<Tournament>> {
    let repo = TournamentRepository::new(pool);
    repo.list(filter, now).await
}

pub async fn get_tournament(pool: &PgPool, id: Uuid) -> Result<Tournament> {
    let repo = TournamentRepository::new(pool);
    repo.find_by_id(id).await
}

pub async fn create_tournament(
    pool: &PgPool,
    actor: &User,
    request: &CreateTournamentRequest,
) -> Result<Tournament> {
    access::ensure_role(actor, &[Role::Organizer], "only organizers can create tournaments")?;

    let repo = TournamentRepository::new(pool);
    let tournament = repo.create(actor.user_id, request).await?;

    tracing::info!(
        tournament_id = %tournament.tournament_id,
        organizer_id = %actor.user_id,
        registration_type = %tournament.registration_type,
        "Tournament created"
    );

    Ok(tournament)
}

pub async fn update_tournament(
    pool: &PgPool,
    actor: &User,
    id: Uuid,
    request: &UpdateTournamentRequest,
) -> Result<Tournament> {
    let repo = TournamentRepository::new(pool);
    repo.update(id, |existing| {
        access::ensure_tournament_organizer(actor, existing)?;
        request.merge_into(existing).map_err(DomainError::InvalidRequest)
    })
    .await
}

pub async fn delete_tournament(pool: &PgPool, actor: &User, id: Uuid) -> Result<()> {
    let repo = TournamentRepository::new(pool);
    let existing = repo.find_by_id(id).await?;
    access::ensure_tournament_organizer(actor, &existing)?;

    repo.delete(id).await?;

    tracing::info!(tournament_id = %id, "Tournament deleted");

    Ok(())
}

pub async fn cancel_tournament(pool: &PgPool, actor: &User, id: Uuid) -> Result<Tournament> {
    let repo = TournamentRepository::new(pool);
    let existing = repo.find_by_id(id).await?;
    access::ensure_tournament_organizer(actor, &existing)?;

    repo.cancel(id).await
}

/// Fails with `RegistrationClosed` while an admin has paused registrations.
pub(crate) async fn ensure_registrations_enabled(pool: &PgPool) -> Result<()> {
    let settings = SettingsRepository::new(pool).get().await?;
    if !settings.registrations_open {
        return Err(DomainError::RegistrationClosed.into());
    }
    Ok(())
}

/// The participant `actor` acts for in `tournament`: themselves, or the team
/// named by `team_id`.
pub(crate) async fn resolve_participant(
    pool: &PgPool,
    actor: &User,
    tournament: &Tournament,
    team_id: Option<Uuid>,
) -> Result<Uuid> {
    let team = match team_id {
        Some(team_id) => Some(TeamRepository::new(pool).find_by_id(team_id).await?),
        None => None,
    };

    Ok(access::resolve_participant(
        actor,
        tournament.registration_type,
        team.as_ref(),
    )?)
}

/// Direct registration for free tournaments
pub async fn register(
    pool: &PgPool,
    actor: &User,
    id: Uuid,
    team_id: Option<Uuid>,
    now: DateTime<Utc>,
) -> Result<Tournament> {
    ensure_registrations_enabled(pool).await?;

    let repo = TournamentRepository::new(pool);
    let tournament = repo.find_by_id(id).await?;
    let participant_id = resolve_participant(pool, actor, &tournament, team_id).await?;

    let tournament = repo
        .update_roster(id, |locked, roster| {
            participants::ensure_direct_registration(locked, now)?;
            roster.register(participant_id, locked.capacity())
        })
        .await?;

    tracing::info!(tournament_id = %id, participant_id = %participant_id, "Participant registered");

    Ok(tournament)
}

pub async fn withdraw(
    pool: &PgPool,
    actor: &User,
    id: Uuid,
    team_id: Option<Uuid>,
) -> Result<Tournament> {
    let repo = TournamentRepository::new(pool);
    let tournament = repo.find_by_id(id).await?;
    let participant_id = resolve_participant(pool, actor, &tournament, team_id).await?;

    let tournament = repo
        .update_roster(id, |locked, roster| {
            if locked.is_cancelled {
                return Err(DomainError::TournamentCancelled);
            }
            roster.withdraw(participant_id)
        })
        .await?;

    tracing::info!(tournament_id = %id, participant_id = %participant_id, "Participant withdrew");

    Ok(tournament)
}

pub async fn approve_participant(
    pool: &PgPool,
    actor: &User,
    id: Uuid,
    participant_id: Uuid,
) -> Result<Tournament> {
    let repo = TournamentRepository::new(pool);
    let tournament = repo
        .update_roster(id, |locked, roster| {
            access::ensure_tournament_organizer(actor, locked)?;
            roster.approve(participant_id)
        })
        .await?;

    tracing::info!(tournament_id = %id, participant_id = %participant_id, "Participant approved");

    Ok(tournament)
}

pub async fn reject_participant(
    pool: &PgPool,
    actor: &User,
    id: Uuid,
    participant_id: Uuid,
) -> Result<Tournament> {
    let repo = TournamentRepository::new(pool);
    let tournament = repo
        .update_roster(id, |locked, roster| {
            access::ensure_tournament_organizer(actor, locked)?;
            roster.reject(participant_id)
        })
        .await?;

    tracing::info!(tournament_id = %id, participant_id = %participant_id, "Participant rejected");

    Ok(tournament)
}

pub async fn generate_fixtures(
    pool: &PgPool,
    actor: &User,
    id: Uuid,
    request: &GenerateFixturesRequest,
) -> Result<Vec<Match>> {
    let tournament = TournamentRepository::new(pool).find_by_id(id).await?;
    access::ensure_tournament_organizer(actor, &tournament)?;

    MatchRepository::new(pool).generate_fixtures(id, request).await
}

pub async fn list_matches(pool: &PgPool, id: Uuid) -> Result<Vec<Match>> {
    // 404 for unknown tournaments rather than an empty list
    TournamentRepository::new(pool).find_by_id(id).await?;

    let filter = MatchFilter {
        tournament_id: Some(id),
        ..MatchFilter::default()
    };
    MatchRepository::new(pool).list(&filter).await
}
