use sqlx::types::Json;
use sqlx::PgConnection;

use crate::pkg::internal::adaptors::jobs::spec::JdMetadataEntry;
use crate::prelude::Result;

pub struct JobMutator<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> JobMutator<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        JobMutator { pool }
    }

    /// An empty criteria list leaves previously stored tags untouched.
    pub async fn increment_usage(
        &mut self,
        filename: &str,
        criteria: &[String],
    ) -> Result<JdMetadataEntry> {
        let tags = (!criteria.is_empty()).then(|| Json(criteria.to_vec()));
        let row = sqlx::query_as::<_, JdMetadataEntry>(
            r#"
            INSERT INTO jd_metadata (filename, usage_count, tags)
            VALUES ($1, 1, $2)
            ON CONFLICT (filename) DO UPDATE
            SET usage_count = jd_metadata.usage_count + 1,
                tags = COALESCE(EXCLUDED.tags, jd_metadata.tags)
            RETURNING filename, upload_date, file_size, usage_count, tags
            "#,
        )
        .bind(filename)
        .bind(tags)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(row)
    }
}
