use std::sync::Arc;

use crate::pkg::internal::adaptors::evaluations::selectors::EvaluationSelector;
use crate::pkg::internal::store::{db_pool, GetTxn};
use crate::prelude::Result;

pub async fn run(limit: i64) -> Result<()> {
    let pool = Arc::new(db_pool()?);
    let mut tx = pool.begin_txn().await?;
    let entries = EvaluationSelector::new(&mut tx).list_recent(limit).await?;
    for entry in entries {
        println!(
            "{}  {:10}  {:>5}  {} vs {}{}",
            entry.created_at.format("%Y-%m-%d %H:%M"),
            entry.status,
            entry
                .score
                .map(|s| format!("{:.1}", s))
                .unwrap_or_else(|| "-".into()),
            entry.jd_name,
            entry.cv_name,
            entry
                .error_message
                .map(|e| format!("  [{}]", e))
                .unwrap_or_default(),
        );
    }
    Ok(())
}
