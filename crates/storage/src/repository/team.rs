use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::team::{CreateTeamRequest, TeamFilter, UpdateTeamRequest};
use crate::error::{DomainError, Result, StorageError};
use crate::models::{Team, User};
use crate::services::access;

/// Repository for Team database operations
pub struct TeamRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TeamRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, filter: &TeamFilter) -> Result<Vec<Team>> {
        let mut query = QueryBuilder::<Postgres>::new(
            r#"
            SELECT team_id, name, sport, manager_id, players, logo_url, created_at
            FROM teams
            WHERE 1=1
            "#,
        );

        if let Some(ref sport) = filter.sport {
            query.push(" AND LOWER(sport) = ").push_bind(sport.to_lowercase());
        }

        if let Some(manager_id) = filter.manager_id {
            query.push(" AND manager_id = ").push_bind(manager_id);
        }

        if let Some(player_id) = filter.player_id {
            query.push(" AND ").push_bind(player_id).push(" = ANY(players)");
        }

        query.push(" ORDER BY name");

        let teams = query.build_query_as::<Team>().fetch_all(self.pool).await?;

        Ok(teams)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Team> {
        sqlx::query_as::<_, Team>(
            r#"
            SELECT team_id, name, sport, manager_id, players, logo_url, created_at
            FROM teams
            WHERE team_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    pub async fn create(&self, manager_id: Uuid, req: &CreateTeamRequest) -> Result<Team> {
        let team = sqlx::query_as::<_, Team>(
            r#"
            INSERT INTO teams (name, sport, manager_id, logo_url)
            VALUES ($1, $2, $3, $4)
            RETURNING team_id, name, sport, manager_id, players, logo_url, created_at
            "#,
        )
        .bind(&req.name)
        .bind(&req.sport)
        .bind(manager_id)
        .bind(&req.logo_url)
        .fetch_one(self.pool)
        .await?;

        Ok(team)
    }

    pub async fn update(&self, existing: &Team, req: &UpdateTeamRequest) -> Result<Team> {
        sqlx::query_as::<_, Team>(
            r#"
            UPDATE teams
            SET name = $2, sport = $3, logo_url = $4
            WHERE team_id = $1
            RETURNING team_id, name, sport, manager_id, players, logo_url, created_at
            "#,
        )
        .bind(existing.team_id)
        .bind(req.name.as_ref().unwrap_or(&existing.name))
        .bind(req.sport.as_ref().unwrap_or(&existing.sport))
        .bind(req.logo_url.as_ref().or(existing.logo_url.as_ref()))
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM teams WHERE team_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    /// Removes `player_id` from the roster. The manager may remove anyone,
    /// a player may only remove themselves.
    pub async fn remove_player(&self, actor: &User, team_id: Uuid, player_id: Uuid) -> Result<Team> {
        let mut tx = self.pool.begin().await?;
        let mut team = Self::lock(&mut tx, team_id).await?;

        if actor.user_id != player_id {
            access::ensure_team_manager(actor, &team)?;
        }

        if !team.remove_player(player_id) {
            return Err(DomainError::InvalidRequest("player is not on this team").into());
        }

        let team = Self::save_players(&mut tx, &team).await?;
        tx.commit().await?;

        tracing::info!(team_id = %team_id, player_id = %player_id, "Player removed from team");

        Ok(team)
    }

    /// Loads a team and locks its row until the surrounding transaction ends.
    pub(crate) async fn lock(conn: &mut PgConnection, id: Uuid) -> Result<Team> {
        sqlx::query_as::<_, Team>(
            r#"
            SELECT team_id, name, sport, manager_id, players, logo_url, created_at
            FROM teams
            WHERE team_id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or(StorageError::NotFound)
    }

    pub(crate) async fn save_players(conn: &mut PgConnection, team: &Team) -> Result<Team> {
        let team = sqlx::query_as::<_, Team>(
            r#"
            UPDATE teams
            SET players = $2
            WHERE team_id = $1
            RETURNING team_id, name, sport, manager_id, players, logo_url, created_at
            "#,
        )
        .bind(team.team_id)
        .bind(&team.players)
        .fetch_one(conn)
        .await?;

        Ok(team)
    }
}
