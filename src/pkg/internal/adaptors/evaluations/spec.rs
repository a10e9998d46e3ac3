use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// Persisted state of one CV's evaluation within a batch. `task_id` is the
/// idempotency key, `"{job_id}_{index}"`, so re-dispatching a batch upserts
/// instead of duplicating. `created_at` plus `status` is what an external
/// sweeper needs to reap rows abandoned mid-`processing`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EvaluationEntry {
    pub id: i32,
    pub task_id: String,
    pub jd_name: String,
    pub cv_name: String,
    pub status: String,
    pub score: Option<f64>,
    pub details: Option<Json<serde_json::Value>>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

pub const ENTRY_COLUMNS: &str =
    "id, task_id, jd_name, cv_name, status, score, details, error_message, created_at, completed_at";
