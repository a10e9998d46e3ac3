use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Pool, Postgres, Transaction};

use crate::conf::settings;
use crate::pkg::internal::adaptors::documents::mutators::DocumentMutator;
use crate::pkg::internal::adaptors::evaluations::mutators::EvaluationMutator;
use crate::pkg::internal::adaptors::jobs::mutators::JobMutator;
use crate::pkg::internal::adaptors::settings::selectors::SettingsSelector;
use crate::pkg::internal::ai::spec::ProviderConfig;
use crate::prelude::Result;

pub fn db_pool() -> Result<Pool<Postgres>> {
    let pool = PgPoolOptions::new()
        .max_connections(settings.database_pool_max_connections)
        .connect_lazy(&settings.database_url)?;
    Ok(pool)
}

#[async_trait::async_trait]
pub trait GetTxn {
    async fn begin_txn(&self) -> Result<Transaction<'static, Postgres>>;
}

#[async_trait::async_trait]
impl GetTxn for Arc<PgPool> {
    async fn begin_txn(&self) -> Result<Transaction<'static, Postgres>> {
        Ok(self.begin().await?)
    }
}

/// The worker's persistence boundary. Idempotency key for record operations
/// is `(job_id, index)`; any error from an implementation is fatal to the
/// whole job, never to a single document.
#[async_trait::async_trait]
pub trait ResultStore: Send + Sync {
    async fn upsert_processing(
        &self,
        task_id: &str,
        jd_name: &str,
        cv_name: &str,
    ) -> Result<()>;

    async fn mark_failed(&self, task_id: &str, error: &str) -> Result<()>;

    async fn mark_completed(
        &self,
        task_id: &str,
        score: f64,
        details: serde_json::Value,
        error_note: Option<&str>,
    ) -> Result<()>;

    async fn record_document_evaluated(
        &self,
        cv_name: &str,
        file_size: Option<i64>,
        file_type: Option<&str>,
    ) -> Result<()>;

    async fn increment_jd_usage(&self, jd_name: &str, criteria: &[String]) -> Result<()>;

    async fn active_provider_config(&self) -> Result<Option<ProviderConfig>>;
}

#[derive(Clone)]
pub struct PgResultStore {
    pool: Arc<PgPool>,
}

impl PgResultStore {
    pub fn new(pool: Arc<PgPool>) -> Self {
        PgResultStore { pool }
    }
}

#[async_trait::async_trait]
impl ResultStore for PgResultStore {
    async fn upsert_processing(
        &self,
        task_id: &str,
        jd_name: &str,
        cv_name: &str,
    ) -> Result<()> {
        let mut tx = self.pool.begin_txn().await?;
        EvaluationMutator::new(&mut tx)
            .upsert_processing(task_id, jd_name, cv_name)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn mark_failed(&self, task_id: &str, error: &str) -> Result<()> {
        let mut tx = self.pool.begin_txn().await?;
        EvaluationMutator::new(&mut tx)
            .mark_failed(task_id, error)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn mark_completed(
        &self,
        task_id: &str,
        score: f64,
        details: serde_json::Value,
        error_note: Option<&str>,
    ) -> Result<()> {
        let mut tx = self.pool.begin_txn().await?;
        EvaluationMutator::new(&mut tx)
            .mark_completed(task_id, score, details, error_note)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn record_document_evaluated(
        &self,
        cv_name: &str,
        file_size: Option<i64>,
        file_type: Option<&str>,
    ) -> Result<()> {
        let mut tx = self.pool.begin_txn().await?;
        DocumentMutator::new(&mut tx)
            .record_evaluated(cv_name, file_size, file_type)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn increment_jd_usage(&self, jd_name: &str, criteria: &[String]) -> Result<()> {
        let mut tx = self.pool.begin_txn().await?;
        JobMutator::new(&mut tx)
            .increment_usage(jd_name, criteria)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn active_provider_config(&self) -> Result<Option<ProviderConfig>> {
        let mut tx = self.pool.begin_txn().await?;
        let entry = SettingsSelector::new(&mut tx).get_active().await?;
        Ok(entry.map(|e| e.to_config()))
    }
}
