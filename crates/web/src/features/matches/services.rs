use sqlx::PgPool;
use storage::{
    dto::matches::{CreateMatchRequest, MatchFilter, MatchResultRequest, UpdateMatchRequest},
    error::Result,
    models::{Match, Tournament, User},
    repository::{matches::MatchRepository, tournament::TournamentRepository},
    services::{access, participants},
};
use uuid::Uuid;

pub async fn list_matches(pool: &PgPool, filter: &MatchFilter) -> Result<Vec<Match>> {
    let repo = MatchRepository::new(pool);
    repo.list(filter).await
}

pub async fn get_match(pool: &PgPool, id: Uuid) -> Result<Match> {
    let repo = MatchRepository::new(pool);
    repo.find_by_id(id).await
}

async fn load_tournament(pool: &PgPool, tournament_id: Option<Uuid>) -> Result<Option<Tournament>> {
    match tournament_id {
        Some(id) => Ok(Some(TournamentRepository::new(pool).find_by_id(id).await?)),
        None => Ok(None),
    }
}

/// Loads a match and checks that `actor` may manage it
async fn load_for_organizer(pool: &PgPool, actor: &User, id: Uuid) -> Result<Match> {
    let game = MatchRepository::new(pool).find_by_id(id).await?;
    let tournament = load_tournament(pool, game.tournament_id).await?;
    access::ensure_match_organizer(actor, tournament.as_ref())?;
    Ok(game)
}

pub async fn create_match(pool: &PgPool, actor: &User, request: &CreateMatchRequest) -> Result<Match> {
    let tournament = load_tournament(pool, request.tournament_id).await?;
    access::ensure_match_organizer(actor, tournament.as_ref())?;

    if let Some(tournament) = &tournament {
        participants::ensure_match_participants(
            tournament,
            request.participant_kind,
            request.participant_a,
            request.participant_b,
        )?;
    }

    let game = MatchRepository::new(pool).create(request).await?;

    tracing::info!(
        match_id = %game.match_id,
        tournament_id = ?game.tournament_id,
        "Match scheduled"
    );

    Ok(game)
}

pub async fn update_match(
    pool: &PgPool,
    actor: &User,
    id: Uuid,
    request: &UpdateMatchRequest,
) -> Result<Match> {
    let existing = load_for_organizer(pool, actor, id).await?;
    MatchRepository::new(pool).update(&existing, request).await
}

pub async fn record_result(
    pool: &PgPool,
    actor: &User,
    id: Uuid,
    request: &MatchResultRequest,
) -> Result<Match> {
    let existing = load_for_organizer(pool, actor, id).await?;
    let game = MatchRepository::new(pool).record_result(&existing, request).await?;

    tracing::info!(
        match_id = %id,
        score_a = request.score_a,
        score_b = request.score_b,
        winner = ?game.winner,
        "Match result recorded"
    );

    Ok(game)
}

pub async fn cancel_match(pool: &PgPool, actor: &User, id: Uuid) -> Result<Match> {
    let existing = load_for_organizer(pool, actor, id).await?;
    let game = MatchRepository::new(pool).cancel(&existing).await?;

    tracing::info!(match_id = %id, "Match cancelled");

    Ok(game)
}

pub async fn delete_match(pool: &PgPool, actor: &User, id: Uuid) -> Result<()> {
    load_for_organizer(pool, actor, id).await?;
    MatchRepository::new(pool).delete(id).await?;

    tracing::info!(match_id = %id, "Match deleted");

    Ok(())
}
