use sqlx::PgPool;
use storage::{
    dto::{
        common::PaginationParams,
        user::{CreateUserRequest, UpdateUserRequest, UserFilter},
    },
    error::{DomainError, Result},
    models::{Role, User},
    repository::user::UserRepository,
    services::access,
};
use uuid::Uuid;

/// List users with filtering and pagination
pub async fn list_users(
    pool: &PgPool,
    filter: &UserFilter,
    pagination: &PaginationParams,
) -> Result<(Vec<User>, i64)> {
    let repo = UserRepository::new(pool);
    repo.list(filter, pagination).await
}

pub async fn get_user(pool: &PgPool, id: Uuid) -> Result<User> {
    let repo = UserRepository::new(pool);
    repo.find_by_id(id).await
}

/// Sign up a new user. Admin accounts are not self-service.
pub async fn create_user(pool: &PgPool, request: &CreateUserRequest) -> Result<User> {
    if request.role == Role::Admin {
        return Err(DomainError::Forbidden("admin accounts cannot be created through sign-up").into());
    }

    let repo = UserRepository::new(pool);
    let user = repo.create(request).await?;

    tracing::info!(user_id = %user.user_id, role = ?user.role, "User created");

    Ok(user)
}

pub async fn update_user(
    pool: &PgPool,
    actor: &User,
    id: Uuid,
    request: &UpdateUserRequest,
) -> Result<User> {
    access::ensure_self_or_admin(actor, id)?;

    if request.role == Some(Role::Admin) && !actor.is_admin() {
        return Err(DomainError::Forbidden("only admins can grant the admin role").into());
    }

    let repo = UserRepository::new(pool);
    let existing = repo.find_by_id(id).await?;
    repo.update(&existing, request).await
}

pub async fn delete_user(pool: &PgPool, actor: &User, id: Uuid) -> Result<()> {
    access::ensure_self_or_admin(actor, id)?;

    let repo = UserRepository::new(pool);
    repo.delete(id).await?;

    tracing::info!(user_id = %id, "User deleted");

    Ok(())
}
