use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::tournament::{CreateTournamentRequest, TournamentFilter};
use crate::error::{DomainError, Result, StorageError};
use crate::models::{Tournament, TournamentStatus};
use crate::services::participants::ParticipantRoster;

/// Repository for Tournament database operations
pub struct TournamentRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TournamentRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List tournaments, newest start first. The status filter is evaluated
    /// against `now` in SQL with the same rules as the derived status.
    pub async fn list(
        &self,
        filter: &TournamentFilter,
        now: DateTime<Utc>,
    ) -> Result<Vec<Tournament>> {
        let mut query = QueryBuilder::<Postgres>::new(
            r#"
            SELECT tournament_id, name, sport, organizer_id, description, banner_url,
                   registration_type, registration_start, registration_end,
                   start_date, end_date, is_cancelled, entry_fee, max_participants,
                   registered_teams, approved_teams, registered_players, approved_players,
                   created_at
            FROM tournaments
            WHERE 1=1
            "#,
        );

        if let Some(ref sport) = filter.sport {
            query.push(" AND LOWER(sport) = ").push_bind(sport.to_lowercase());
        }

        if let Some(organizer_id) = filter.organizer_id {
            query.push(" AND organizer_id = ").push_bind(organizer_id);
        }

        if let Some(registration_type) = filter.registration_type {
            query.push(" AND registration_type = ").push_bind(registration_type);
        }

        match filter.status {
            Some(TournamentStatus::Cancelled) => {
                query.push(" AND is_cancelled");
            }
            Some(TournamentStatus::Completed) => {
                query.push(" AND NOT is_cancelled AND end_date < ").push_bind(now);
            }
            Some(TournamentStatus::Live) => {
                query
                    .push(" AND NOT is_cancelled AND start_date <= ")
                    .push_bind(now)
                    .push(" AND end_date >= ")
                    .push_bind(now);
            }
            Some(TournamentStatus::Upcoming) => {
                query.push(" AND NOT is_cancelled AND start_date > ").push_bind(now);
            }
            None => {}
        }

        query.push(" ORDER BY start_date DESC, created_at DESC");

        let tournaments = query
            .build_query_as::<Tournament>()
            .fetch_all(self.pool)
            .await?;

        Ok(tournaments)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Tournament> {
        sqlx::query_as::<_, Tournament>(
            r#"
            SELECT tournament_id, name, sport, organizer_id, description, banner_url,
                   registration_type, registration_start, registration_end,
                   start_date, end_date, is_cancelled, entry_fee, max_participants,
                   registered_teams, approved_teams, registered_players, approved_players,
                   created_at
            FROM tournaments
            WHERE tournament_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    pub async fn create(&self, organizer_id: Uuid, req: &CreateTournamentRequest) -> Result<Tournament> {
        let tournament = sqlx::query_as::<_, Tournament>(
            r#"
            INSERT INTO tournaments (
                name, sport, organizer_id, description, banner_url, registration_type,
                registration_start, registration_end, start_date, end_date,
                entry_fee, max_participants
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING tournament_id, name, sport, organizer_id, description, banner_url,
                      registration_type, registration_start, registration_end,
                      start_date, end_date, is_cancelled, entry_fee, max_participants,
                      registered_teams, approved_teams, registered_players, approved_players,
                      created_at
            "#,
        )
        .bind(&req.name)
        .bind(&req.sport)
        .bind(organizer_id)
        .bind(&req.description)
        .bind(&req.banner_url)
        .bind(req.registration_type)
        .bind(req.registration_start)
        .bind(req.registration_end)
        .bind(req.start_date)
        .bind(req.end_date)
        .bind(req.entry_fee)
        .bind(req.max_participants)
        .fetch_one(self.pool)
        .await?;

        Ok(tournament)
    }

    /// Persists the editable fields of an already merged and validated tournament
    /// Applies `change` to the locked row and stores the result. The roster
    /// cannot move between the capacity check and the write.
    pub async fn update<F>(&self, id: Uuid, change: F) -> Result<Tournament>
    where
        F: FnOnce(&Tournament) -> std::result::Result<Tournament, DomainError>,
    {
        let mut tx = self.pool.begin().await?;
        let existing = Self::lock(&mut tx, id).await?;
        let merged = change(&existing)?;

        let tournament = sqlx::query_as::<_, Tournament>(
            r#"
            UPDATE tournaments
            SET name = $2, sport = $3, description = $4, banner_url = $5,
                registration_start = $6, registration_end = $7,
                start_date = $8, end_date = $9, entry_fee = $10, max_participants = $11
            WHERE tournament_id = $1
            RETURNING tournament_id, name, sport, organizer_id, description, banner_url,
                      registration_type, registration_start, registration_end,
                      start_date, end_date, is_cancelled, entry_fee, max_participants,
                      registered_teams, approved_teams, registered_players, approved_players,
                      created_at
            "#,
        )
        .bind(merged.tournament_id)
        .bind(&merged.name)
        .bind(&merged.sport)
        .bind(&merged.description)
        .bind(&merged.banner_url)
        .bind(merged.registration_start)
        .bind(merged.registration_end)
        .bind(merged.start_date)
        .bind(merged.end_date)
        .bind(merged.entry_fee)
        .bind(merged.max_participants)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(tournament)
    }

    /// Cancels the tournament together with its matches that have not been played
    pub async fn cancel(&self, id: Uuid) -> Result<Tournament> {
        let mut tx = self.pool.begin().await?;
        let tournament = Self::lock(&mut tx, id).await?;

        if tournament.is_cancelled {
            return Err(DomainError::TournamentCancelled.into());
        }

        let tournament = sqlx::query_as::<_, Tournament>(
            r#"
            UPDATE tournaments
            SET is_cancelled = TRUE
            WHERE tournament_id = $1
            RETURNING tournament_id, name, sport, organizer_id, description, banner_url,
                      registration_type, registration_start, registration_end,
                      start_date, end_date, is_cancelled, entry_fee, max_participants,
                      registered_teams, approved_teams, registered_players, approved_players,
                      created_at
            "#,
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        let cancelled_matches = sqlx::query(
            r#"
            UPDATE matches
            SET is_cancelled = TRUE, status = 'cancelled'
            WHERE tournament_id = $1 AND status <> 'completed'
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;

        tracing::info!(
            tournament_id = %id,
            cancelled_matches,
            "Tournament cancelled"
        );

        Ok(tournament)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM tournaments WHERE tournament_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    /// Runs `change` against the locked tournament's roster and stores the
    /// result. Nothing is written when `change` fails.
    pub async fn update_roster<F>(&self, id: Uuid, change: F) -> Result<Tournament>
    where
        F: FnOnce(&Tournament, &mut ParticipantRoster) -> std::result::Result<(), DomainError>,
    {
        let mut tx = self.pool.begin().await?;
        let mut tournament = Self::lock(&mut tx, id).await?;

        let mut roster = tournament.roster();
        change(&tournament, &mut roster)?;
        tournament.set_roster(roster);

        let tournament = Self::save_roster(&mut tx, &tournament).await?;
        tx.commit().await?;

        Ok(tournament)
    }

    /// Loads a tournament and locks its row until the surrounding transaction ends.
    pub(crate) async fn lock(conn: &mut PgConnection, id: Uuid) -> Result<Tournament> {
        sqlx::query_as::<_, Tournament>(
            r#"
            SELECT tournament_id, name, sport, organizer_id, description, banner_url,
                   registration_type, registration_start, registration_end,
                   start_date, end_date, is_cancelled, entry_fee, max_participants,
                   registered_teams, approved_teams, registered_players, approved_players,
                   created_at
            FROM tournaments
            WHERE tournament_id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or(StorageError::NotFound)
    }

    pub(crate) async fn save_roster(conn: &mut PgConnection, tournament: &Tournament) -> Result<Tournament> {
        let tournament = sqlx::query_as::<_, Tournament>(
            r#"
            UPDATE tournaments
            SET registered_teams = $2, approved_teams = $3,
                registered_players = $4, approved_players = $5
            WHERE tournament_id = $1
            RETURNING tournament_id, name, sport, organizer_id, description, banner_url,
                      registration_type, registration_start, registration_end,
                      start_date, end_date, is_cancelled, entry_fee, max_participants,
                      registered_teams, approved_teams, registered_players, approved_players,
                      created_at
            "#,
        )
        .bind(tournament.tournament_id)
        .bind(&tournament.registered_teams)
        .bind(&tournament.approved_teams)
        .bind(&tournament.registered_players)
        .bind(&tournament.approved_players)
        .fetch_one(conn)
        .await?;

        Ok(tournament)
    }
}
