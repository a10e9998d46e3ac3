use std::sync::Arc;

use sqlx::{migrate::Migrator, postgres::PgPoolOptions};

use crate::{conf::settings, pkg::internal::store::GetTxn, prelude::Result};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub async fn apply() -> Result<()> {
    let pool = Arc::new(
        PgPoolOptions::new()
            .connect(&settings.database_url)
            .await?,
    );

    tracing::debug!("connected to db");
    let mut tx = pool.begin_txn().await?;
    MIGRATOR.run(&mut *tx).await?;
    tx.commit().await?;

    println!("Migrations applied successfully");
    Ok(())
}
