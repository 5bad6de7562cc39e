use crate::objects;
use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use http::Method;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::signer::Signer;
use object_store::Result as ObjectResult;
use std::collections::HashMap;
use std::time::Duration;

/// S3 storage implementation
///
/// `object_store` binds one client to one bucket, so a client is built per
/// configured bucket up front. Buckets outside that set (a notification for a
/// bucket the process was not configured with) get a client built on demand.
#[derive(Clone)]
pub struct S3Storage {
    stores: HashMap<String, AmazonS3>,
    region: String,
    endpoint_url: Option<String>, // Custom endpoint for S3-compatible providers
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `buckets` - Buckets this process reads from and writes to
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    pub fn new(
        buckets: &[String],
        region: String,
        endpoint_url: Option<String>,
    ) -> StorageResult<Self> {
        let mut stores = HashMap::with_capacity(buckets.len());
        for bucket in buckets {
            let store = Self::build_store(AmazonS3Builder::from_env(), bucket, &region, &endpoint_url)?;
            stores.insert(bucket.clone(), store);
        }

        Ok(S3Storage {
            stores,
            region,
            endpoint_url,
        })
    }

    /// Like [`S3Storage::new`] but with explicit static credentials instead of
    /// the environment. Signing is purely local, so this also serves offline use.
    pub fn with_credentials(
        buckets: &[String],
        region: String,
        endpoint_url: Option<String>,
        access_key_id: &str,
        secret_access_key: &str,
    ) -> StorageResult<Self> {
        let mut stores = HashMap::with_capacity(buckets.len());
        for bucket in buckets {
            let builder = AmazonS3Builder::new()
                .with_access_key_id(access_key_id)
                .with_secret_access_key(secret_access_key);
            let store = Self::build_store(builder, bucket, &region, &endpoint_url)?;
            stores.insert(bucket.clone(), store);
        }

        Ok(S3Storage {
            stores,
            region,
            endpoint_url,
        })
    }

    fn build_store(
        builder: AmazonS3Builder,
        bucket: &str,
        region: &str,
        endpoint_url: &Option<String>,
    ) -> StorageResult<AmazonS3> {
        let mut builder = builder.with_region(region).with_bucket_name(bucket);

        if let Some(endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))
    }

    fn store(&self, bucket: &str) -> StorageResult<AmazonS3> {
        if let Some(store) = self.stores.get(bucket) {
            return Ok(store.clone());
        }
        tracing::debug!(bucket = %bucket, "Building S3 client for unconfigured bucket");
        Self::build_store(
            AmazonS3Builder::from_env(),
            bucket,
            &self.region,
            &self.endpoint_url,
        )
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn download(&self, bucket: &str, key: &str) -> StorageResult<Vec<u8>> {
        let store = self.store(bucket)?;
        objects::get(&store, bucket, key).await
    }

    async fn upload(&self, bucket: &str, key: &str, data: Vec<u8>) -> StorageResult<()> {
        let store = self.store(bucket)?;
        objects::put(&store, bucket, key, data).await
    }

    async fn copy(
        &self,
        from_bucket: &str,
        from_key: &str,
        to_bucket: &str,
        to_key: &str,
    ) -> StorageResult<()> {
        if from_bucket == to_bucket {
            let store = self.store(from_bucket)?;
            return objects::copy_within(&store, from_bucket, from_key, to_key).await;
        }

        // Each client is bound to one bucket: stream through this process.
        let data = self.download(from_bucket, from_key).await?;
        self.upload(to_bucket, to_key, data).await?;

        tracing::info!(
            from_bucket = %from_bucket,
            from_key = %from_key,
            to_bucket = %to_bucket,
            to_key = %to_key,
            "S3 cross-bucket copy successful"
        );

        Ok(())
    }

    async fn presigned_put_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        let store = self.store(bucket)?;
        let location = objects::location(key)?;
        let url_result: ObjectResult<_> = store.signed_url(Method::PUT, &location, expires_in).await;

        let url = url_result
            .map_err(|e| {
                tracing::error!(error = %e, bucket = %bucket, key = %key, "S3 URL signing failed");
                StorageError::BackendError(e.to_string())
            })?
            .to_string();

        Ok(url)
    }

    async fn exists(&self, bucket: &str, key: &str) -> StorageResult<bool> {
        let store = self.store(bucket)?;
        objects::exists(&store, key).await
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_storage() -> S3Storage {
        S3Storage::with_credentials(
            &["uploads".to_string(), "quarantine".to_string()],
            "us-east-1".to_string(),
            None,
            "AKIDEXAMPLE",
            "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
        )
        .unwrap()
    }

    #[tokio::test]
    async fn presigned_put_url_is_scoped_to_bucket_and_key() {
        let storage = offline_storage();
        let url = storage
            .presigned_put_url("uploads", "abc-report.csv", Duration::from_secs(300))
            .await
            .unwrap();

        assert!(url.contains("uploads"));
        assert!(url.contains("abc-report.csv"));
        assert!(url.contains("X-Amz-Expires=300"));
        assert!(url.contains("X-Amz-Signature="));
    }

    #[tokio::test]
    async fn presigned_put_url_signs_the_key_verbatim() {
        let storage = offline_storage();
        for (key, encoded) in [
            ("abc-report#1.csv", "/uploads/abc-report%231.csv"),
            ("abc-50%.csv", "/uploads/abc-50%25.csv"),
        ] {
            let url = storage
                .presigned_put_url("uploads", key, Duration::from_secs(300))
                .await
                .unwrap();
            let path = url.split('?').next().unwrap();
            assert!(path.ends_with(encoded), "{} signed as {}", key, path);
        }
    }

    #[tokio::test]
    async fn presigning_rejects_keys_with_empty_segments() {
        let result = offline_storage()
            .presigned_put_url("uploads", "abc-dir//x.csv", Duration::from_secs(300))
            .await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn custom_endpoint_is_used_for_signing() {
        let storage = S3Storage::with_credentials(
            &["uploads".to_string()],
            "us-east-1".to_string(),
            Some("http://localhost:9000".to_string()),
            "minioadmin",
            "minioadmin",
        )
        .unwrap();

        let url = storage
            .presigned_put_url("uploads", "abc-a.json", Duration::from_secs(60))
            .await
            .unwrap();
        assert!(url.starts_with("http://localhost:9000"));
    }

    #[test]
    fn backend_type_is_s3() {
        assert_eq!(offline_storage().backend_type(), StorageBackend::S3);
    }
}
