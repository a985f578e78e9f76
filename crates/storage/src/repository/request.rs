use chrono::Utc;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::dto::request::SendRequestPayload;
use crate::error::{DomainError, Result, StorageError};
use crate::models::{Request, RequestStatus};
use crate::repository::team::TeamRepository;
use crate::services::request_lifecycle::{self, RequestAction};

/// Repository for join/invite requests between players and teams
pub struct RequestRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RequestRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Requests addressed to `user_id`, newest first
    pub async fn list_incoming(&self, user_id: Uuid, status: Option<RequestStatus>) -> Result<Vec<Request>> {
        let requests = sqlx::query_as::<_, Request>(
            r#"
            SELECT request_id, sender_id, receiver_id, team_id, request_type, status,
                   message, created_at, updated_at
            FROM requests
            WHERE receiver_id = $1 AND ($2::request_status IS NULL OR status = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(status)
        .fetch_all(self.pool)
        .await?;

        Ok(requests)
    }

    /// Requests sent by `user_id`, newest first
    pub async fn list_outgoing(&self, user_id: Uuid, status: Option<RequestStatus>) -> Result<Vec<Request>> {
        let requests = sqlx::query_as::<_, Request>(
            r#"
            SELECT request_id, sender_id, receiver_id, team_id, request_type, status,
                   message, created_at, updated_at
            FROM requests
            WHERE sender_id = $1 AND ($2::request_status IS NULL OR status = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(status)
        .fetch_all(self.pool)
        .await?;

        Ok(requests)
    }

    /// Stores a new PENDING request. Callers validate roles and roster first.
    ///
    /// The team row is locked while open requests about the same player are
    /// checked, so a join request and an invite cannot both be pending.
    pub async fn create(&self, sender_id: Uuid, payload: &SendRequestPayload) -> Result<Request> {
        let mut tx = self.pool.begin().await?;
        TeamRepository::lock(&mut tx, payload.team_id).await?;

        let player_id = payload.request_type.player_of(sender_id, payload.receiver_id);
        let open = sqlx::query_as::<_, Request>(
            r#"
            SELECT request_id, sender_id, receiver_id, team_id, request_type, status,
                   message, created_at, updated_at
            FROM requests
            WHERE team_id = $1 AND status = 'pending'
              AND (sender_id = $2 OR receiver_id = $2)
            "#,
        )
        .bind(payload.team_id)
        .bind(player_id)
        .fetch_all(&mut *tx)
        .await?;
        request_lifecycle::ensure_no_open_request(player_id, payload.team_id, &open)?;

        let request = sqlx::query_as::<_, Request>(
            r#"
            INSERT INTO requests (sender_id, receiver_id, team_id, request_type, message)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING request_id, sender_id, receiver_id, team_id, request_type, status,
                      message, created_at, updated_at
            "#,
        )
        .bind(sender_id)
        .bind(payload.receiver_id)
        .bind(payload.team_id)
        .bind(payload.request_type)
        .bind(&payload.message)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            let err = StorageError::from(e);
            if err.is_unique_violation() {
                StorageError::Domain(DomainError::DuplicateRequest)
            } else {
                err.or_constraint("Request already exists", "Team or user does not exist")
            }
        })?;

        tx.commit().await?;

        Ok(request)
    }

    /// Moves a request out of PENDING on behalf of `actor_id`.
    ///
    /// Acceptance adds the player to the team roster in the same transaction.
    /// Cancellation removes the row; the returned value reflects the
    /// cancelled record.
    pub async fn transition(&self, request_id: Uuid, actor_id: Uuid, action: RequestAction) -> Result<Request> {
        let mut tx = self.pool.begin().await?;
        let request = Self::lock(&mut tx, request_id).await?;

        let next = request_lifecycle::transition(&request, actor_id, action)?;

        let updated = match next {
            RequestStatus::Cancelled => {
                sqlx::query("DELETE FROM requests WHERE request_id = $1")
                    .bind(request_id)
                    .execute(&mut *tx)
                    .await?;
                Request {
                    status: RequestStatus::Cancelled,
                    updated_at: Utc::now(),
                    ..request
                }
            }
            status => Self::set_status(&mut tx, request_id, status).await?,
        };

        if updated.status == RequestStatus::Accepted {
            let mut team = TeamRepository::lock(&mut tx, updated.team_id).await?;
            if request_lifecycle::apply_acceptance(&mut team, &updated) {
                TeamRepository::save_players(&mut tx, &team).await?;
            }
        }

        tx.commit().await?;

        tracing::info!(
            request_id = %request_id,
            request_type = ?updated.request_type,
            status = %updated.status,
            "Request transitioned"
        );

        Ok(updated)
    }

    async fn lock(conn: &mut PgConnection, id: Uuid) -> Result<Request> {
        sqlx::query_as::<_, Request>(
            r#"
            SELECT request_id, sender_id, receiver_id, team_id, request_type, status,
                   message, created_at, updated_at
            FROM requests
            WHERE request_id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or(StorageError::NotFound)
    }

    async fn set_status(conn: &mut PgConnection, id: Uuid, status: RequestStatus) -> Result<Request> {
        let request = sqlx::query_as::<_, Request>(
            r#"
            UPDATE requests
            SET status = $2, updated_at = NOW()
            WHERE request_id = $1
            RETURNING request_id, sender_id, receiver_id, team_id, request_type, status,
                      message, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_one(conn)
        .await?;

        Ok(request)
    }
}
