use sqlx::PgConnection;

use crate::pkg::internal::adaptors::documents::spec::CvMetadataEntry;
use crate::prelude::Result;

pub struct DocumentMutator<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> DocumentMutator<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        DocumentMutator { pool }
    }

    pub async fn record_evaluated(
        &mut self,
        filename: &str,
        file_size: Option<i64>,
        file_type: Option<&str>,
    ) -> Result<CvMetadataEntry> {
        let row = sqlx::query_as::<_, CvMetadataEntry>(
            r#"
            INSERT INTO cv_metadata (filename, file_size, file_type, evaluation_count, last_evaluated_at)
            VALUES ($1, $2, $3, 1, CURRENT_TIMESTAMP)
            ON CONFLICT (filename) DO UPDATE
            SET file_size = COALESCE(EXCLUDED.file_size, cv_metadata.file_size),
                file_type = COALESCE(EXCLUDED.file_type, cv_metadata.file_type),
                evaluation_count = cv_metadata.evaluation_count + 1,
                last_evaluated_at = CURRENT_TIMESTAMP
            RETURNING filename, upload_date, file_size, file_type, last_evaluated_at, evaluation_count
            "#,
        )
        .bind(filename)
        .bind(file_size)
        .bind(file_type)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(row)
    }
}
