use std::sync::Arc;

use crate::pkg::internal::ai::registry::ProviderRegistry;
use crate::pkg::internal::store::{db_pool, PgResultStore, ResultStore};
use crate::prelude::Result;

pub async fn run() -> Result<()> {
    let pool = Arc::new(db_pool()?);
    let store = PgResultStore::new(pool);
    match store.active_provider_config().await? {
        None => println!("no active AI provider configured"),
        Some(config) => {
            let adapter = ProviderRegistry::with_builtins().build(&config)?;
            let reachable = adapter.test_connection().await;
            println!(
                "{} ({}): {}",
                adapter.name(),
                config.model,
                if reachable { "reachable" } else { "unreachable" }
            );
        }
    }
    Ok(())
}
