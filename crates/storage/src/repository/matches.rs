use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::matches::{CreateMatchRequest, MatchFilter, MatchResultRequest, UpdateMatchRequest};
use crate::dto::tournament::GenerateFixturesRequest;
use crate::error::{Result, StorageError};
use crate::models::{Match, MatchStatus};
use crate::repository::tournament::TournamentRepository;
use crate::services::{fixtures, match_state};

/// Repository for Match database operations
pub struct MatchRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MatchRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, filter: &MatchFilter) -> Result<Vec<Match>> {
        let mut query = QueryBuilder::<Postgres>::new(
            r#"
            SELECT match_id, tournament_id, participant_kind, participant_a, participant_b,
                   scheduled_at, venue, round, is_cancelled, status,
                   score_a, score_b, winner, created_at
            FROM matches
            WHERE 1=1
            "#,
        );

        if let Some(tournament_id) = filter.tournament_id {
            query.push(" AND tournament_id = ").push_bind(tournament_id);
        }

        if let Some(participant_id) = filter.participant_id {
            query
                .push(" AND (participant_a = ")
                .push_bind(participant_id)
                .push(" OR participant_b = ")
                .push_bind(participant_id)
                .push(")");
        }

        if let Some(from) = filter.from {
            query.push(" AND scheduled_at >= ").push_bind(from);
        }

        if let Some(to) = filter.to {
            query.push(" AND scheduled_at <= ").push_bind(to);
        }

        query.push(" ORDER BY scheduled_at, round");

        let matches = query.build_query_as::<Match>().fetch_all(self.pool).await?;

        Ok(matches)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Match> {
        sqlx::query_as::<_, Match>(
            r#"
            SELECT match_id, tournament_id, participant_kind, participant_a, participant_b,
                   scheduled_at, venue, round, is_cancelled, status,
                   score_a, score_b, winner, created_at
            FROM matches
            WHERE match_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    pub async fn create(&self, req: &CreateMatchRequest) -> Result<Match> {
        sqlx::query_as::<_, Match>(
            r#"
            INSERT INTO matches (
                tournament_id, participant_kind, participant_a, participant_b,
                scheduled_at, venue, round
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING match_id, tournament_id, participant_kind, participant_a, participant_b,
                      scheduled_at, venue, round, is_cancelled, status,
                      score_a, score_b, winner, created_at
            "#,
        )
        .bind(req.tournament_id)
        .bind(req.participant_kind)
        .bind(req.participant_a)
        .bind(req.participant_b)
        .bind(req.scheduled_at)
        .bind(&req.venue)
        .bind(req.round)
        .fetch_one(self.pool)
        .await
        .map_err(|e| StorageError::from(e).or_constraint("Match already exists", "Tournament does not exist"))
    }

    pub async fn update(&self, existing: &Match, req: &UpdateMatchRequest) -> Result<Match> {
        let merged = req.merge_into(existing)?;

        sqlx::query_as::<_, Match>(
            r#"
            UPDATE matches
            SET scheduled_at = $2, venue = $3, round = $4
            WHERE match_id = $1
            RETURNING match_id, tournament_id, participant_kind, participant_a, participant_b,
                      scheduled_at, venue, round, is_cancelled, status,
                      score_a, score_b, winner, created_at
            "#,
        )
        .bind(merged.match_id)
        .bind(merged.scheduled_at)
        .bind(&merged.venue)
        .bind(merged.round)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// Stores the final score; the winner follows from it and the match is
    /// marked completed.
    pub async fn record_result(&self, existing: &Match, req: &MatchResultRequest) -> Result<Match> {
        match_state::ensure_scorable(existing)?;

        let winner = existing.winner_for(req.score_a, req.score_b);

        sqlx::query_as::<_, Match>(
            r#"
            UPDATE matches
            SET score_a = $2, score_b = $3, winner = $4, status = $5
            WHERE match_id = $1
            RETURNING match_id, tournament_id, participant_kind, participant_a, participant_b,
                      scheduled_at, venue, round, is_cancelled, status,
                      score_a, score_b, winner, created_at
            "#,
        )
        .bind(existing.match_id)
        .bind(req.score_a)
        .bind(req.score_b)
        .bind(winner)
        .bind(MatchStatus::Completed)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    pub async fn cancel(&self, existing: &Match) -> Result<Match> {
        match_state::ensure_cancellable(existing)?;

        sqlx::query_as::<_, Match>(
            r#"
            UPDATE matches
            SET is_cancelled = TRUE, status = $2
            WHERE match_id = $1
            RETURNING match_id, tournament_id, participant_kind, participant_a, participant_b,
                      scheduled_at, venue, round, is_cancelled, status,
                      score_a, score_b, winner, created_at
            "#,
        )
        .bind(existing.match_id)
        .bind(MatchStatus::Cancelled)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM matches WHERE match_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    /// Generates and stores fixtures for the approved participants of a
    /// tournament. The tournament row stays locked while fixtures are written
    /// so two concurrent calls cannot both succeed.
    pub async fn generate_fixtures(
        &self,
        tournament_id: Uuid,
        req: &GenerateFixturesRequest,
    ) -> Result<Vec<Match>> {
        let mut tx = self.pool.begin().await?;
        let tournament = TournamentRepository::lock(&mut tx, tournament_id).await?;

        let existing: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM matches WHERE tournament_id = $1")
                .bind(tournament_id)
                .fetch_one(&mut *tx)
                .await?;
        fixtures::ensure_can_generate(&tournament, existing)?;

        let first_at: DateTime<Utc> = req.first_match_at.unwrap_or(tournament.start_date);
        let roster = tournament.roster();
        let planned = fixtures::generate(req.format, roster.approved(), first_at, req.interval())?;

        let mut created = Vec::with_capacity(planned.len());
        for fixture in &planned {
            let game = sqlx::query_as::<_, Match>(
                r#"
                INSERT INTO matches (
                    tournament_id, participant_kind, participant_a, participant_b,
                    scheduled_at, venue, round
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING match_id, tournament_id, participant_kind, participant_a, participant_b,
                          scheduled_at, venue, round, is_cancelled, status,
                          score_a, score_b, winner, created_at
                "#,
            )
            .bind(tournament_id)
            .bind(tournament.registration_type)
            .bind(fixture.participant_a)
            .bind(fixture.participant_b)
            .bind(fixture.scheduled_at)
            .bind(&req.venue)
            .bind(fixture.round)
            .fetch_one(&mut *tx)
            .await?;
            created.push(game);
        }

        tx.commit().await?;

        tracing::info!(
            tournament_id = %tournament_id,
            format = ?req.format,
            fixtures = created.len(),
            "Fixtures generated"
        );

        Ok(created)
    }
}
