use std::sync::Arc;

use crate::pkg::internal::adaptors::settings::mutators::SettingsMutator;
use crate::pkg::internal::ai::registry::ProviderRegistry;
use crate::pkg::internal::ai::spec::ProviderConfig;
use crate::pkg::internal::store::{db_pool, GetTxn};
use crate::prelude::Result;

pub async fn set_provider(
    provider: &str,
    model: Option<String>,
    api_key: Option<String>,
    host: Option<String>,
    port: Option<i32>,
) -> Result<()> {
    // reject unknown names before touching the database
    ProviderRegistry::with_builtins().build(&ProviderConfig {
        provider: provider.into(),
        model: String::new(),
        api_key: String::new(),
        endpoint: String::new(),
    })?;

    let pool = Arc::new(db_pool()?);
    let mut tx = pool.begin_txn().await?;
    let entry = SettingsMutator::new(&mut tx)
        .set_active(
            provider,
            model.as_deref(),
            api_key.as_deref(),
            host.as_deref(),
            port,
        )
        .await?;
    tx.commit().await?;

    let config = entry.to_config();
    println!("active provider: {} ({})", config.provider, config.model);
    Ok(())
}
