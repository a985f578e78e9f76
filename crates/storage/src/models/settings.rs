use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PlatformSettings {
    pub platform_name: String,
    pub currency: String,
    pub platform_fee_percent: Decimal,
    pub registrations_open: bool,
    pub updated_at: DateTime<Utc>,
}
