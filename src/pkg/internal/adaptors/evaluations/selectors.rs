use sqlx::PgConnection;

use crate::pkg::internal::adaptors::evaluations::spec::{EvaluationEntry, ENTRY_COLUMNS};
use crate::prelude::Result;

pub struct EvaluationSelector<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> EvaluationSelector<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        EvaluationSelector { pool }
    }

    pub async fn get_by_task_id(&mut self, task_id: &str) -> Result<Option<EvaluationEntry>> {
        let row = sqlx::query_as::<_, EvaluationEntry>(&format!(
            "SELECT {} FROM evaluations WHERE task_id = $1",
            ENTRY_COLUMNS
        ))
        .bind(task_id)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn list_recent(&mut self, limit: i64) -> Result<Vec<EvaluationEntry>> {
        let rows = sqlx::query_as::<_, EvaluationEntry>(&format!(
            "SELECT {} FROM evaluations ORDER BY created_at DESC LIMIT $1",
            ENTRY_COLUMNS
        ))
        .bind(limit)
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }
}
