use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::common::PaginationParams;
use crate::dto::user::{CreateUserRequest, UpdateUserRequest, UserFilter};
use crate::error::{Result, StorageError};
use crate::models::User;

/// Repository for User database operations
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List users matching `filter`, one page at a time
    pub async fn list(
        &self,
        filter: &UserFilter,
        pagination: &PaginationParams,
    ) -> Result<(Vec<User>, i64)> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM users WHERE 1=1");
        push_filters(&mut count, filter);
        let total_items = count
            .build_query_scalar::<i64>()
            .fetch_one(self.pool)
            .await?;

        let mut query = QueryBuilder::<Postgres>::new(
            r#"
            SELECT user_id, name, email, role, avatar_url, created_at
            FROM users
            WHERE 1=1
            "#,
        );
        push_filters(&mut query, filter);
        query
            .push(" ORDER BY name, created_at LIMIT ")
            .push_bind(pagination.limit())
            .push(" OFFSET ")
            .push_bind(pagination.offset());

        let users = query.build_query_as::<User>().fetch_all(self.pool).await?;

        Ok((users, total_items))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, name, email, role, avatar_url, created_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    pub async fn create(&self, req: &CreateUserRequest) -> Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, role, avatar_url)
            VALUES ($1, $2, $3, $4)
            RETURNING user_id, name, email, role, avatar_url, created_at
            "#,
        )
        .bind(&req.name)
        .bind(req.email.to_lowercase())
        .bind(req.role)
        .bind(&req.avatar_url)
        .fetch_one(self.pool)
        .await
        .map_err(|e| StorageError::from(e).or_constraint("Email already registered", "Invalid reference"))
    }

    pub async fn update(&self, existing: &User, req: &UpdateUserRequest) -> Result<User> {
        let name = req.name.as_ref().unwrap_or(&existing.name);
        let email = req
            .email
            .as_ref()
            .map(|e| e.to_lowercase())
            .unwrap_or_else(|| existing.email.clone());
        let role = req.role.unwrap_or(existing.role);
        let avatar_url = req.avatar_url.as_ref().or(existing.avatar_url.as_ref());

        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = $2, email = $3, role = $4, avatar_url = $5
            WHERE user_id = $1
            RETURNING user_id, name, email, role, avatar_url, created_at
            "#,
        )
        .bind(existing.user_id)
        .bind(name)
        .bind(email)
        .bind(role)
        .bind(avatar_url)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| StorageError::from(e).or_constraint("Email already registered", "Invalid reference"))?
        .ok_or(StorageError::NotFound)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}

fn push_filters(query: &mut QueryBuilder<'_, Postgres>, filter: &UserFilter) {
    if let Some(role) = filter.role {
        query.push(" AND role = ").push_bind(role);
    }

    if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search.to_lowercase());
        query
            .push(" AND (LOWER(name) LIKE ")
            .push_bind(pattern.clone())
            .push(" OR email LIKE ")
            .push_bind(pattern)
            .push(")");
    }
}
