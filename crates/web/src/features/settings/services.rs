use sqlx::PgPool;
use storage::{
    dto::settings::UpdateSettingsRequest, error::Result, models::PlatformSettings,
    repository::settings::SettingsRepository,
};

pub async fn get_settings(pool: &PgPool) -> Result<PlatformSettings> {
    let repo = SettingsRepository::new(pool);
    repo.get().await
}

pub async fn update_settings(pool: &PgPool, request: &UpdateSettingsRequest) -> Result<PlatformSettings> {
    let repo = SettingsRepository::new(pool);
    let settings = repo.update(request).await?;

    tracing::info!(
        currency = %settings.currency,
        registrations_open = settings.registrations_open,
        "Platform settings updated"
    );

    Ok(settings)
}
