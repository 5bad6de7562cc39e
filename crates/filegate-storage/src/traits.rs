//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use filegate_core::AppError;
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Storage(err.to_string())
    }
}

/// Storage abstraction trait
///
/// Objects are addressed by bucket and key. Every backend maps a bucket to its
/// own namespace (an S3 bucket, a sub-directory, an in-memory store).
#[async_trait]
pub trait Storage: Send + Sync {
    /// Read an object's full content
    async fn download(&self, bucket: &str, key: &str) -> StorageResult<Vec<u8>>;

    /// Write an object, replacing any existing content at the key
    async fn upload(&self, bucket: &str, key: &str, data: Vec<u8>) -> StorageResult<()>;

    /// Copy an object, possibly across buckets. The source is left in place.
    async fn copy(
        &self,
        from_bucket: &str,
        from_key: &str,
        to_bucket: &str,
        to_key: &str,
    ) -> StorageResult<()>;

    /// Generate a presigned PUT URL for direct uploads.
    ///
    /// Clients can upload with HTTP PUT to the returned URL. Only supported by S3 backends;
    /// other backends return a `ConfigError`.
    async fn presigned_put_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> StorageResult<String>;

    /// Check if an object exists
    async fn exists(&self, bucket: &str, key: &str) -> StorageResult<bool>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

#[cfg(test)]
mod tests {
    use super::*;
    use filegate_core::ErrorMetadata;

    #[test]
    fn storage_errors_become_upstream_app_errors() {
        let err: AppError = StorageError::NotFound("abc-x.csv".to_string()).into();
        assert!(matches!(err, AppError::Storage(_)));
        assert_eq!(err.error_code(), "STORAGE_ERROR");
        assert!(err.to_string().contains("abc-x.csv"));
    }
}
