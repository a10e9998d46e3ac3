use sqlx::PgConnection;

use crate::pkg::internal::adaptors::settings::spec::{ProviderSettingsEntry, SETTINGS_COLUMNS};
use crate::prelude::Result;

pub struct SettingsSelector<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> SettingsSelector<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        SettingsSelector { pool }
    }

    pub async fn get_active(&mut self) -> Result<Option<ProviderSettingsEntry>> {
        let row = sqlx::query_as::<_, ProviderSettingsEntry>(&format!(
            "SELECT {} FROM ai_settings WHERE is_active ORDER BY updated_at DESC LIMIT 1",
            SETTINGS_COLUMNS
        ))
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }
}
