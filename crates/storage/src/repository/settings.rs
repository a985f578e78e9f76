use sqlx::PgPool;

use crate::dto::settings::UpdateSettingsRequest;
use crate::error::{Result, StorageError};
use crate::models::PlatformSettings;

pub struct SettingsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SettingsRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self) -> Result<PlatformSettings> {
        sqlx::query_as::<_, PlatformSettings>(
            r#"
            SELECT platform_name, currency, platform_fee_percent, registrations_open, updated_at
            FROM platform_settings
            WHERE settings_id = 1
            "#,
        )
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    pub async fn update(&self, req: &UpdateSettingsRequest) -> Result<PlatformSettings> {
        sqlx::query_as::<_, PlatformSettings>(
            r#"
            UPDATE platform_settings
            SET platform_name = COALESCE($1, platform_name),
                currency = COALESCE($2, currency),
                platform_fee_percent = COALESCE($3, platform_fee_percent),
                registrations_open = COALESCE($4, registrations_open),
                updated_at = NOW()
            WHERE settings_id = 1
            RETURNING platform_name, currency, platform_fee_percent, registrations_open, updated_at
            "#,
        )
        .bind(&req.platform_name)
        .bind(&req.currency)
        .bind(req.platform_fee_percent)
        .bind(req.registrations_open)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }
}
