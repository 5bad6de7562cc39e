//! Operations shared by the `object_store` backed implementations (S3 and in-memory).

use crate::traits::{StorageError, StorageResult};
use bytes::Bytes;
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{ObjectStore, ObjectStoreExt, PutPayload, Result as ObjectResult};
use std::time::Instant;

pub(crate) fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Object location for a key, taken verbatim (no percent-encoding).
/// Keys with empty, `.` or `..` segments, or a leading or trailing `/`, are
/// invalid.
pub(crate) fn location(key: &str) -> StorageResult<Path> {
    let path = Path::parse(key).map_err(|e| StorageError::InvalidKey(format!("{}: {}", key, e)))?;
    if key.is_empty() || path.as_ref() != key {
        return Err(StorageError::InvalidKey(format!(
            "{}: empty or has a leading or trailing delimiter",
            key
        )));
    }
    Ok(path)
}

pub(crate) async fn get(store: &dyn ObjectStore, bucket: &str, key: &str) -> StorageResult<Vec<u8>> {
    let start = Instant::now();
    let location = location(key)?;

    let result: ObjectResult<_> = store.get(&location).await;

    let result = result.map_err(|e| match e {
        ObjectStoreError::NotFound { .. } => StorageError::NotFound(format!("{}/{}", bucket, key)),
        other => {
            tracing::error!(
                error = %other,
                bucket = %bucket,
                key = %key,
                duration_ms = elapsed_ms(start),
                "Object download failed"
            );
            StorageError::DownloadFailed(other.to_string())
        }
    })?;

    let bytes = result
        .bytes()
        .await
        .map_err(|e| StorageError::DownloadFailed(e.to_string()))?;

    tracing::info!(
        bucket = %bucket,
        key = %key,
        size_bytes = bytes.len() as u64,
        duration_ms = elapsed_ms(start),
        "Object download successful"
    );

    Ok(bytes.to_vec())
}

pub(crate) async fn put(
    store: &dyn ObjectStore,
    bucket: &str,
    key: &str,
    data: Vec<u8>,
) -> StorageResult<()> {
    let start = Instant::now();
    let size = data.len() as u64;
    let location = location(key)?;

    let result: ObjectResult<_> = store
        .put(&location, PutPayload::from(Bytes::from(data)))
        .await;

    result.map_err(|e| {
        tracing::error!(
            error = %e,
            bucket = %bucket,
            key = %key,
            size_bytes = size,
            duration_ms = elapsed_ms(start),
            "Object upload failed"
        );
        StorageError::UploadFailed(e.to_string())
    })?;

    tracing::info!(
        bucket = %bucket,
        key = %key,
        size_bytes = size,
        duration_ms = elapsed_ms(start),
        "Object upload successful"
    );

    Ok(())
}

/// Server-side copy inside one bucket.
pub(crate) async fn copy_within(
    store: &dyn ObjectStore,
    bucket: &str,
    from_key: &str,
    to_key: &str,
) -> StorageResult<()> {
    let start = Instant::now();
    let from = location(from_key)?;
    let to = location(to_key)?;

    let result: ObjectResult<_> = store.copy(&from, &to).await;

    result.map_err(|e| match e {
        ObjectStoreError::NotFound { .. } => {
            StorageError::NotFound(format!("{}/{}", bucket, from_key))
        }
        other => StorageError::BackendError(other.to_string()),
    })?;

    tracing::info!(
        bucket = %bucket,
        from_key = %from_key,
        to_key = %to_key,
        duration_ms = elapsed_ms(start),
        "Object copy successful"
    );

    Ok(())
}

pub(crate) async fn exists(store: &dyn ObjectStore, key: &str) -> StorageResult<bool> {
    let location = location(key)?;
    match store.head(&location).await {
        Ok(_) => Ok(true),
        Err(ObjectStoreError::NotFound { .. }) => Ok(false),
        Err(e) => Err(StorageError::BackendError(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_keeps_key_verbatim() {
        for key in ["abc-report#1.csv", "abc-50%.csv", "invalid/abc-a [1].csv"] {
            assert_eq!(location(key).unwrap().as_ref(), key);
        }
    }

    #[test]
    fn location_rejects_keys_it_would_rewrite() {
        for key in ["abc-dir//x.csv", "abc-x/", "/abc-x.csv", "abc/../x.csv", ""] {
            assert!(
                matches!(location(key), Err(StorageError::InvalidKey(_))),
                "{:?}",
                key
            );
        }
    }
}
