//! Presigned upload credentials for the input bucket.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use filegate_core::{AppError, UploadKey};
use filegate_storage::{Storage, StorageError};

pub const MISSING_FILENAME_MESSAGE: &str = "Missing filename in request body";

/// A time-limited PUT URL and the key the upload will land at.
#[derive(Debug, Clone)]
pub struct UploadCredential {
    pub file_key: UploadKey,
    pub upload_url: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues upload credentials. Creates no object and writes no record.
#[derive(Clone)]
pub struct UploadCredentialIssuer {
    storage: Arc<dyn Storage>,
    input_bucket: String,
    expiry: Duration,
}

impl UploadCredentialIssuer {
    pub fn new(storage: Arc<dyn Storage>, input_bucket: impl Into<String>, expiry: Duration) -> Self {
        Self {
            storage,
            input_bucket: input_bucket.into(),
            expiry,
        }
    }

    pub fn input_bucket(&self) -> &str {
        &self.input_bucket
    }

    pub async fn issue(&self, filename: Option<&str>) -> Result<UploadCredential, AppError> {
        let filename = filename
            .filter(|name| !name.is_empty())
            .ok_or_else(|| AppError::InvalidRequest(MISSING_FILENAME_MESSAGE.to_string()))?;

        let file_key = UploadKey::generate(filename);
        let upload_url = self
            .storage
            .presigned_put_url(&self.input_bucket, file_key.as_str(), self.expiry)
            .await
            .map_err(|e| match e {
                StorageError::InvalidKey(detail) => {
                    AppError::InvalidRequest(format!("Invalid filename: {}", detail))
                }
                other => other.into(),
            })?;

        let expires_at = Utc::now()
            + chrono::Duration::from_std(self.expiry)
                .map_err(|e| AppError::Configuration(format!("Invalid URL expiry: {}", e)))?;

        tracing::info!(
            bucket = %self.input_bucket,
            file_key = %file_key,
            expires_in_secs = self.expiry.as_secs(),
            "Generated presigned upload URL"
        );

        Ok(UploadCredential {
            file_key,
            upload_url,
            expires_at,
        })
    }
}
