//! Processing pipeline for one uploaded object:
//! read → validate → extract → persist → quarantine (invalid only).
//!
//! Any error after the read starts diverts to a failure record. The pipeline
//! itself never returns an error; callers get a [`ProcessOutcome`].

use std::sync::Arc;
use std::time::Instant;

use filegate_core::{AppError, FileRecord, ProcessedFile, S3Event, UploadKey, ValidationStatus};
use filegate_db::MetadataStore;
use filegate_storage::Storage;

use crate::extractor::extract_metadata;
use crate::validator::{ContentValidator, KeywordValidator};

/// Prefix for quarantined copies inside the quarantine bucket.
pub const QUARANTINE_PREFIX: &str = "invalid/";

#[derive(Debug, Clone, PartialEq)]
pub enum ProcessOutcome {
    Processed(ProcessedFile),
    Failed { s3_key: String, error: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    NoRecords,
    Completed(ProcessOutcome),
}

impl EventOutcome {
    pub fn status_code(&self) -> u16 {
        match self {
            EventOutcome::NoRecords => 400,
            EventOutcome::Completed(ProcessOutcome::Processed(_)) => 200,
            EventOutcome::Completed(ProcessOutcome::Failed { .. }) => 500,
        }
    }
}

pub fn quarantine_key(key: &UploadKey) -> String {
    format!("{}{}", QUARANTINE_PREFIX, key)
}

/// Processing orchestrator. Cheap to clone and shared across requests.
#[derive(Clone)]
pub struct FileProcessor {
    storage: Arc<dyn Storage>,
    records: Arc<dyn MetadataStore>,
    validator: Arc<dyn ContentValidator>,
    quarantine_bucket: String,
}

impl FileProcessor {
    pub fn new(
        storage: Arc<dyn Storage>,
        records: Arc<dyn MetadataStore>,
        quarantine_bucket: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            records,
            validator: Arc::new(KeywordValidator),
            quarantine_bucket: quarantine_bucket.into(),
        }
    }

    pub fn with_validator(mut self, validator: Arc<dyn ContentValidator>) -> Self {
        self.validator = validator;
        self
    }

    pub fn quarantine_bucket(&self) -> &str {
        &self.quarantine_bucket
    }

    /// Process the first record of a notification. Extra records are ignored.
    pub async fn handle_event(&self, event: &S3Event) -> EventOutcome {
        let Some(first) = event.records.first() else {
            tracing::warn!("No S3 records found in the event");
            return EventOutcome::NoRecords;
        };

        if event.records.len() > 1 {
            tracing::warn!(
                ignored = event.records.len() - 1,
                "Event carries more than one record; only the first is processed"
            );
        }

        let key = UploadKey::from(first.s3.object.key.as_str());
        EventOutcome::Completed(self.process(&first.s3.bucket.name, &key).await)
    }

    #[tracing::instrument(skip_all, fields(bucket = %source_bucket, key = %key))]
    pub async fn process(&self, source_bucket: &str, key: &UploadKey) -> ProcessOutcome {
        let start = Instant::now();
        // Byte length of the decoded content, once the read succeeded.
        let mut content_len: i64 = 0;

        match self.run(source_bucket, key, &mut content_len).await {
            Ok(processed) => {
                tracing::info!(
                    job_id = %processed.job_id,
                    is_valid = processed.is_valid,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "File processed"
                );
                ProcessOutcome::Processed(processed)
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    error_code = filegate_core::ErrorMetadata::error_code(&e),
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Error processing file"
                );
                let error = e.to_string();
                self.record_failure(source_bucket, key, content_len, &error)
                    .await;
                ProcessOutcome::Failed {
                    s3_key: key.to_string(),
                    error,
                }
            }
        }
    }

    async fn run(
        &self,
        source_bucket: &str,
        key: &UploadKey,
        content_len: &mut i64,
    ) -> Result<ProcessedFile, AppError> {
        let bytes = self.storage.download(source_bucket, key.as_str()).await?;
        let content = String::from_utf8(bytes)?;
        *content_len = content.len() as i64;
        tracing::debug!(size_bytes = content.len(), "Read file content");

        let verdict = self.validator.validate(&content);
        tracing::debug!(
            is_valid = verdict.is_valid,
            message = %verdict.message,
            "Validation result"
        );

        let metadata = extract_metadata(&content, key);
        let record = FileRecord {
            job_id: metadata.job_id,
            original_file_name: metadata.original_file_name,
            storage_key: metadata.storage_key,
            file_size_bytes: metadata.file_size_bytes,
            processing_timestamp: metadata.processing_timestamp,
            validation_status: ValidationStatus::from_validity(verdict.is_valid),
            validation_message: verdict.message.clone(),
            source_bucket: source_bucket.to_string(),
        };

        self.records.upsert(&record).await?;
        tracing::info!(job_id = %record.job_id, status = %record.validation_status, "Record stored");

        if !verdict.is_valid {
            let target = quarantine_key(key);
            self.storage
                .copy(source_bucket, key.as_str(), &self.quarantine_bucket, &target)
                .await?;
            tracing::info!(
                quarantine_bucket = %self.quarantine_bucket,
                quarantine_key = %target,
                "File copied to quarantine"
            );
        }

        Ok(ProcessedFile {
            s3_key: key.to_string(),
            is_valid: verdict.is_valid,
            validation_message: verdict.message,
            job_id: record.job_id,
        })
    }

    /// Best effort: a failure here is logged and swallowed.
    async fn record_failure(&self, source_bucket: &str, key: &UploadKey, size: i64, error: &str) {
        let record = FileRecord::failure(
            key.as_str(),
            source_bucket,
            key.original_filename(),
            size,
            error,
        );

        match self.records.upsert(&record).await {
            Ok(()) => tracing::info!("Logged processing failure"),
            Err(db_err) => tracing::error!(
                error = %db_err,
                original_error = %error,
                "Failed to log processing failure"
            ),
        }
    }
}
