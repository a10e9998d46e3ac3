use sqlx::types::Json;
use sqlx::PgConnection;

use crate::pkg::internal::adaptors::evaluations::spec::{EvaluationEntry, ENTRY_COLUMNS};
use crate::prelude::Result;

pub struct EvaluationMutator<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> EvaluationMutator<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        EvaluationMutator { pool }
    }

    /// Creates or resets the record for this batch position in `processing`
    /// state. Conflict on `task_id` means a re-dispatch of the same batch.
    pub async fn upsert_processing(
        &mut self,
        task_id: &str,
        jd_name: &str,
        cv_name: &str,
    ) -> Result<EvaluationEntry> {
        let row = sqlx::query_as::<_, EvaluationEntry>(&format!(
            r#"
            INSERT INTO evaluations (task_id, jd_name, cv_name, status)
            VALUES ($1, $2, $3, 'processing')
            ON CONFLICT (task_id) DO UPDATE
            SET status = 'processing', error_message = NULL, completed_at = NULL
            RETURNING {}
            "#,
            ENTRY_COLUMNS
        ))
        .bind(task_id)
        .bind(jd_name)
        .bind(cv_name)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn mark_failed(&mut self, task_id: &str, error: &str) -> Result<EvaluationEntry> {
        let row = sqlx::query_as::<_, EvaluationEntry>(&format!(
            r#"
            UPDATE evaluations
            SET status = 'failed', score = NULL, error_message = $2,
                completed_at = CURRENT_TIMESTAMP
            WHERE task_id = $1
            RETURNING {}
            "#,
            ENTRY_COLUMNS
        ))
        .bind(task_id)
        .bind(error)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(row)
    }

    /// Terminal success. A degraded evaluation still lands here; its error
    /// note travels in `error_message` next to the score and details.
    pub async fn mark_completed(
        &mut self,
        task_id: &str,
        score: f64,
        details: serde_json::Value,
        error_note: Option<&str>,
    ) -> Result<EvaluationEntry> {
        let row = sqlx::query_as::<_, EvaluationEntry>(&format!(
            r#"
            UPDATE evaluations
            SET status = 'completed', score = $2, details = $3, error_message = $4,
                completed_at = CURRENT_TIMESTAMP
            WHERE task_id = $1
            RETURNING {}
            "#,
            ENTRY_COLUMNS
        ))
        .bind(task_id)
        .bind(score)
        .bind(Json(details))
        .bind(error_note)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(row)
    }
}
