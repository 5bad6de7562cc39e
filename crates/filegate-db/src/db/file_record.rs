use chrono::{DateTime, Utc};
use filegate_core::config::is_sql_identifier;
use filegate_core::{AppError, FileRecord, ValidationStatus};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

/// Persistence of file records, keyed by JobId.
///
/// `upsert` is last-write-wins: a second record with the same JobId replaces
/// the first.
#[async_trait::async_trait]
pub trait MetadataStore: Send + Sync {
    async fn upsert(&self, record: &FileRecord) -> Result<(), AppError>;

    async fn get(&self, job_id: &str) -> Result<Option<FileRecord>, AppError>;

    async fn health_check(&self) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct PostgresMetadataStore {
    pool: PgPool,
    table: String,
}

impl PostgresMetadataStore {
    pub fn new(pool: PgPool, table: impl Into<String>) -> Result<Self, AppError> {
        let table = table.into();
        // The name is spliced into SQL text; bind parameters cannot carry identifiers.
        if !is_sql_identifier(&table) {
            return Err(AppError::Configuration(format!(
                "Invalid metadata table name: {}",
                table
            )));
        }
        Ok(Self { pool, table })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    fn create_table_sql(&self) -> String {
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS "{table}" (
                job_id TEXT PRIMARY KEY,
                original_file_name TEXT NOT NULL,
                storage_key TEXT NOT NULL,
                file_size_bytes BIGINT NOT NULL,
                processing_timestamp TIMESTAMPTZ NOT NULL,
                validation_status TEXT NOT NULL,
                validation_message TEXT NOT NULL,
                source_bucket TEXT NOT NULL
            )
            "#,
            table = self.table
        )
    }

    fn upsert_sql(&self) -> String {
        format!(
            r#"
            INSERT INTO "{table}" (
                job_id, original_file_name, storage_key, file_size_bytes,
                processing_timestamp, validation_status, validation_message, source_bucket
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (job_id) DO UPDATE SET
                original_file_name = EXCLUDED.original_file_name,
                storage_key = EXCLUDED.storage_key,
                file_size_bytes = EXCLUDED.file_size_bytes,
                processing_timestamp = EXCLUDED.processing_timestamp,
                validation_status = EXCLUDED.validation_status,
                validation_message = EXCLUDED.validation_message,
                source_bucket = EXCLUDED.source_bucket
            "#,
            table = self.table
        )
    }

    fn select_sql(&self) -> String {
        format!(
            r#"
            SELECT job_id, original_file_name, storage_key, file_size_bytes,
                   processing_timestamp, validation_status, validation_message, source_bucket
            FROM "{table}"
            WHERE job_id = $1
            "#,
            table = self.table
        )
    }

    /// Create the record table if it does not exist yet
    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        sqlx::query(&self.create_table_sql())
            .execute(&self.pool)
            .await?;
        tracing::info!(table = %self.table, "Metadata table ready");
        Ok(())
    }

    fn row_to_record(row: &PgRow) -> Result<FileRecord, AppError> {
        let status: String = row.try_get("validation_status")?;
        let validation_status = status
            .parse::<ValidationStatus>()
            .map_err(AppError::Internal)?;
        let processing_timestamp: DateTime<Utc> = row.try_get("processing_timestamp")?;

        Ok(FileRecord {
            job_id: row.try_get("job_id")?,
            original_file_name: row.try_get("original_file_name")?,
            storage_key: row.try_get("storage_key")?,
            file_size_bytes: row.try_get("file_size_bytes")?,
            processing_timestamp,
            validation_status,
            validation_message: row.try_get("validation_message")?,
            source_bucket: row.try_get("source_bucket")?,
        })
    }
}

#[async_trait::async_trait]
impl MetadataStore for PostgresMetadataStore {
    #[tracing::instrument(skip(self, record), fields(
        db.system = "postgresql",
        db.table = %self.table,
        db.operation = "upsert",
        job_id = %record.job_id
    ))]
    async fn upsert(&self, record: &FileRecord) -> Result<(), AppError> {
        sqlx::query(&self.upsert_sql())
            .bind(&record.job_id)
            .bind(&record.original_file_name)
            .bind(&record.storage_key)
            .bind(record.file_size_bytes)
            .bind(record.processing_timestamp)
            .bind(record.validation_status.as_str())
            .bind(&record.validation_message)
            .bind(&record.source_bucket)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = ?e,
                    job_id = %record.job_id,
                    status = %record.validation_status,
                    "Failed to upsert file record"
                );
                AppError::Database(e)
            })?;

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(
        db.system = "postgresql",
        db.table = %self.table,
        db.operation = "select"
    ))]
    async fn get(&self, job_id: &str) -> Result<Option<FileRecord>, AppError> {
        let row = sqlx::query(&self.select_sql())
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_record).transpose()
    }

    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    fn lazy_pool() -> PgPool {
        PgPoolOptions::new()
            .connect_lazy("postgres://localhost/filegate_test")
            .unwrap()
    }

    #[tokio::test]
    async fn rejects_unsafe_table_names() {
        let result = PostgresMetadataStore::new(lazy_pool(), "records\"; DROP TABLE x; --");
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[tokio::test]
    async fn statements_target_configured_table() {
        let store = PostgresMetadataStore::new(lazy_pool(), "JobMetadata").unwrap();
        assert_eq!(store.table(), "JobMetadata");
        assert!(store.create_table_sql().contains("\"JobMetadata\""));
        assert!(store.create_table_sql().contains("job_id TEXT PRIMARY KEY"));

        let upsert = store.upsert_sql();
        assert!(upsert.contains("INSERT INTO \"JobMetadata\""));
        assert!(upsert.contains("ON CONFLICT (job_id) DO UPDATE"));

        assert!(store.select_sql().contains("WHERE job_id = $1"));
    }
}
