use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::{Request, RequestStatus, RequestType};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RequestResponse {
    pub request_id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub team_id: Uuid,
    pub request_type: RequestType,
    pub status: RequestStatus,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Request> for RequestResponse {
    fn from(req: Request) -> Self {
        Self {
            request_id: req.request_id,
            sender_id: req.sender_id,
            receiver_id: req.receiver_id,
            team_id: req.team_id,
            request_type: req.request_type,
            status: req.status,
            message: req.message,
            created_at: req.created_at,
            updated_at: req.updated_at,
        }
    }
}

/// Join request (player → team manager) or invite (team manager → player).
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SendRequestPayload {
    pub receiver_id: Uuid,

    pub team_id: Uuid,

    pub request_type: RequestType,

    #[validate(length(max = 1000, message = "Message must be at most 1000 characters"))]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct RequestFilter {
    pub status: Option<RequestStatus>,
}
