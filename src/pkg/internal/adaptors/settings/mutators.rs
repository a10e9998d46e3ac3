use sqlx::PgConnection;

use crate::pkg::internal::adaptors::settings::spec::{ProviderSettingsEntry, SETTINGS_COLUMNS};
use crate::prelude::Result;

pub struct SettingsMutator<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> SettingsMutator<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        SettingsMutator { pool }
    }

    /// Activates one backend configuration, deactivating the rest. Runs in
    /// the caller's transaction so the two statements land together.
    pub async fn set_active(
        &mut self,
        provider: &str,
        model_name: Option<&str>,
        api_key: Option<&str>,
        host: Option<&str>,
        port: Option<i32>,
    ) -> Result<ProviderSettingsEntry> {
        sqlx::query("UPDATE ai_settings SET is_active = FALSE, updated_at = CURRENT_TIMESTAMP WHERE is_active")
            .execute(&mut *self.pool)
            .await?;
        let row = sqlx::query_as::<_, ProviderSettingsEntry>(&format!(
            r#"
            INSERT INTO ai_settings (provider, model_name, api_key, host, port, is_active)
            VALUES ($1, $2, $3, $4, $5, TRUE)
            RETURNING {}
            "#,
            SETTINGS_COLUMNS
        ))
        .bind(provider)
        .bind(model_name)
        .bind(api_key)
        .bind(host)
        .bind(port)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(row)
    }
}
