use crate::objects;
use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use object_store::memory::InMemory;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// In-memory storage, one `InMemory` object store per bucket.
///
/// Buckets spring into existence on first write. Reads from a bucket that was
/// never written to report `NotFound`.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    buckets: Arc<RwLock<HashMap<String, Arc<InMemory>>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    async fn bucket(&self, bucket: &str) -> Option<Arc<InMemory>> {
        self.buckets.read().await.get(bucket).cloned()
    }

    async fn bucket_or_create(&self, bucket: &str) -> Arc<InMemory> {
        let mut buckets = self.buckets.write().await;
        buckets
            .entry(bucket.to_string())
            .or_insert_with(|| Arc::new(InMemory::new()))
            .clone()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn download(&self, bucket: &str, key: &str) -> StorageResult<Vec<u8>> {
        let store = self
            .bucket(bucket)
            .await
            .ok_or_else(|| StorageError::NotFound(format!("{}/{}", bucket, key)))?;
        objects::get(store.as_ref(), bucket, key).await
    }

    async fn upload(&self, bucket: &str, key: &str, data: Vec<u8>) -> StorageResult<()> {
        let store = self.bucket_or_create(bucket).await;
        objects::put(store.as_ref(), bucket, key, data).await
    }

    async fn copy(
        &self,
        from_bucket: &str,
        from_key: &str,
        to_bucket: &str,
        to_key: &str,
    ) -> StorageResult<()> {
        if from_bucket == to_bucket {
            let store = self
                .bucket(from_bucket)
                .await
                .ok_or_else(|| StorageError::NotFound(format!("{}/{}", from_bucket, from_key)))?;
            return objects::copy_within(store.as_ref(), from_bucket, from_key, to_key).await;
        }

        let data = self.download(from_bucket, from_key).await?;
        self.upload(to_bucket, to_key, data).await
    }

    async fn presigned_put_url(
        &self,
        _bucket: &str,
        _key: &str,
        _expires_in: Duration,
    ) -> StorageResult<String> {
        Err(StorageError::ConfigError(
            "Presigned upload URLs are only supported by the S3 storage backend".to_string(),
        ))
    }

    async fn exists(&self, bucket: &str, key: &str) -> StorageResult<bool> {
        match self.bucket(bucket).await {
            Some(store) => objects::exists(store.as_ref(), key).await,
            None => Ok(false),
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_storage_upload_download() {
        let storage = MemoryStorage::new();
        storage
            .upload("uploads", "abc-a.json", b"{\"job_id\":1}".to_vec())
            .await
            .unwrap();

        let data = storage.download("uploads", "abc-a.json").await.unwrap();
        assert_eq!(data, b"{\"job_id\":1}");
    }

    #[tokio::test]
    async fn test_buckets_are_isolated() {
        let storage = MemoryStorage::new();
        storage.upload("uploads", "k", b"x".to_vec()).await.unwrap();

        assert!(storage.exists("uploads", "k").await.unwrap());
        assert!(!storage.exists("quarantine", "k").await.unwrap());
        assert!(matches!(
            storage.download("quarantine", "k").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_cross_bucket_copy_keeps_source() {
        let storage = MemoryStorage::new();
        storage
            .upload("uploads", "abc-bad.csv", Vec::new())
            .await
            .unwrap();

        storage
            .copy("uploads", "abc-bad.csv", "quarantine", "invalid/abc-bad.csv")
            .await
            .unwrap();

        assert!(storage.exists("uploads", "abc-bad.csv").await.unwrap());
        assert!(storage
            .exists("quarantine", "invalid/abc-bad.csv")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_same_bucket_copy() {
        let storage = MemoryStorage::new();
        storage.upload("b", "a", b"1".to_vec()).await.unwrap();
        storage.copy("b", "a", "b", "c").await.unwrap();
        assert_eq!(storage.download("b", "c").await.unwrap(), b"1");
    }

    #[tokio::test]
    async fn test_missing_object_is_not_found() {
        let storage = MemoryStorage::new();
        storage.upload("uploads", "other", Vec::new()).await.unwrap();
        assert!(matches!(
            storage.download("uploads", "missing").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_presign_unsupported() {
        let storage = MemoryStorage::new();
        let result = storage
            .presigned_put_url("uploads", "k", Duration::from_secs(300))
            .await;
        assert!(matches!(result, Err(StorageError::ConfigError(_))));
    }
}
