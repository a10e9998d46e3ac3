use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Per-CV usage metadata, bumped as a side effect of each completed
/// evaluation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CvMetadataEntry {
    pub filename: String,
    pub upload_date: DateTime<Utc>,
    pub file_size: Option<i64>,
    pub file_type: Option<String>,
    pub last_evaluated_at: Option<DateTime<Utc>>,
    pub evaluation_count: i32,
}
