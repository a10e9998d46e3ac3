use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// Per-JD usage metadata. `tags` holds the must-have criteria attached to
/// the job description.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JdMetadataEntry {
    pub filename: String,
    pub upload_date: DateTime<Utc>,
    pub file_size: Option<i64>,
    pub usage_count: i32,
    pub tags: Option<Json<Vec<String>>>,
}
