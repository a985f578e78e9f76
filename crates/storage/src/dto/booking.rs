use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{Booking, ParticipantKind, PaymentStatus};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookingResponse {
    pub booking_id: Uuid,
    pub tournament_id: Uuid,
    pub payer_kind: ParticipantKind,
    pub payer_id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub currency: String,
    pub payment_status: PaymentStatus,
    /// Reference to hand to the payment gateway checkout
    pub gateway_order_id: String,
    pub gateway_payment_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(b: Booking) -> Self {
        Self {
            booking_id: b.booking_id,
            tournament_id: b.tournament_id,
            payer_kind: b.payer_kind,
            payer_id: b.payer_id,
            user_id: b.user_id,
            amount: b.amount,
            currency: b.currency,
            payment_status: b.payment_status,
            gateway_order_id: b.gateway_order_id,
            gateway_payment_id: b.gateway_payment_id,
            created_at: b.created_at,
            updated_at: b.updated_at,
        }
    }
}

/// Payment gateway completion callback.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CompletePaymentRequest {
    #[validate(length(min = 1, max = 64))]
    pub gateway_order_id: String,

    #[validate(length(min = 1, max = 128))]
    pub gateway_payment_id: Option<String>,

    pub success: bool,
}
