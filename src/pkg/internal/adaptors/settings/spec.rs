use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::conf::provider_defaults;
use crate::pkg::internal::ai::spec::ProviderConfig;

/// One configured AI backend. At most one row is active; the worker reads it
/// once at job start.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProviderSettingsEntry {
    pub id: i32,
    pub provider: String,
    pub model_name: Option<String>,
    pub api_key: Option<String>,
    pub host: Option<String>,
    pub port: Option<i32>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProviderSettingsEntry {
    /// Resolves the row into a runnable config, folding in endpoint/model
    /// defaults and, for ollama, the host/port columns.
    pub fn to_config(&self) -> ProviderConfig {
        let (default_endpoint, default_model) = provider_defaults(&self.provider);
        let endpoint = if self.provider == "ollama" {
            format!(
                "http://{}:{}",
                self.host.as_deref().unwrap_or("localhost"),
                self.port.unwrap_or(11434)
            )
        } else {
            default_endpoint.to_string()
        };
        let model = self
            .model_name
            .clone()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| default_model.to_string());
        ProviderConfig {
            provider: self.provider.clone(),
            model,
            api_key: self.api_key.clone().unwrap_or_default(),
            endpoint,
        }
    }
}

pub const SETTINGS_COLUMNS: &str =
    "id, provider, model_name, api_key, host, port, is_active, created_at, updated_at";
