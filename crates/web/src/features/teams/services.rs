use sqlx::PgPool;
use storage::{
    dto::team::{CreateTeamRequest, TeamFilter, UpdateTeamRequest},
    error::Result,
    models::{Role, Team, User},
    repository::team::TeamRepository,
    services::access,
};
use uuid::Uuid;

pub async fn list_teams(pool: &PgPool, filter: &TeamFilter) -> Result<Vec<Team>> {
    let repo = TeamRepository::new(pool);
    repo.list(filter).await
}

pub async fn get_team(pool: &PgPool, id: Uuid) -> Result<Team> {
    let repo = TeamRepository::new(pool);
    repo.find_by_id(id).await
}

/// Create a team managed by `actor`
pub async fn create_team(pool: &PgPool, actor: &User, request: &CreateTeamRequest) -> Result<Team> {
    access::ensure_role(actor, &[Role::TeamManager], "only team managers can create teams")?;

    let repo = TeamRepository::new(pool);
    let team = repo.create(actor.user_id, request).await?;

    tracing::info!(team_id = %team.team_id, manager_id = %actor.user_id, "Team created");

    Ok(team)
}

pub async fn update_team(
    pool: &PgPool,
    actor: &User,
    id: Uuid,
    request: &UpdateTeamRequest,
) -> Result<Team> {
    let repo = TeamRepository::new(pool);
    let existing = repo.find_by_id(id).await?;
    access::ensure_team_manager(actor, &existing)?;

    repo.update(&existing, request).await
}

pub async fn delete_team(pool: &PgPool, actor: &User, id: Uuid) -> Result<()> {
    let repo = TeamRepository::new(pool);
    let existing = repo.find_by_id(id).await?;
    access::ensure_team_manager(actor, &existing)?;

    repo.delete(id).await?;

    tracing::info!(team_id = %id, "Team deleted");

    Ok(())
}

pub async fn remove_player(pool: &PgPool, actor: &User, team_id: Uuid, player_id: Uuid) -> Result<Team> {
    let repo = TeamRepository::new(pool);
    repo.remove_player(actor, team_id, player_id).await
}
