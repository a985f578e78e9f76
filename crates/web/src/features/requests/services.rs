use sqlx::PgPool;
use storage::{
    dto::request::SendRequestPayload,
    error::Result,
    models::{Request, RequestStatus, User},
    repository::{request::RequestRepository, team::TeamRepository, user::UserRepository},
    services::request_lifecycle::{self, RequestAction},
};
use uuid::Uuid;

/// Open a PENDING join request or invite from `sender`
pub async fn send_request(pool: &PgPool, sender: &User, payload: &SendRequestPayload) -> Result<Request> {
    let receiver = UserRepository::new(pool).find_by_id(payload.receiver_id).await?;
    let team = TeamRepository::new(pool).find_by_id(payload.team_id).await?;

    request_lifecycle::validate_new_request(sender, &receiver, &team, payload.request_type)?;

    let request = RequestRepository::new(pool).create(sender.user_id, payload).await?;

    tracing::info!(
        request_id = %request.request_id,
        request_type = ?request.request_type,
        team_id = %request.team_id,
        "Request sent"
    );

    Ok(request)
}

pub async fn list_incoming(pool: &PgPool, user_id: Uuid, status: Option<RequestStatus>) -> Result<Vec<Request>> {
    let repo = RequestRepository::new(pool);
    repo.list_incoming(user_id, status).await
}

pub async fn list_outgoing(pool: &PgPool, user_id: Uuid, status: Option<RequestStatus>) -> Result<Vec<Request>> {
    let repo = RequestRepository::new(pool);
    repo.list_outgoing(user_id, status).await
}

pub async fn transition(pool: &PgPool, actor: &User, id: Uuid, action: RequestAction) -> Result<Request> {
    let repo = RequestRepository::new(pool);
    repo.transition(id, actor.user_id, action).await
}
