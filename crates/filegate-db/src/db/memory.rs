use std::collections::HashMap;
use std::sync::Arc;

use filegate_core::{AppError, FileRecord};
use tokio::sync::RwLock;

use super::MetadataStore;

/// Record store held in process memory. Used for development and tests.
#[derive(Clone, Default)]
pub struct MemoryMetadataStore {
    records: Arc<RwLock<HashMap<String, FileRecord>>>,
}

impl MemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl MetadataStore for MemoryMetadataStore {
    async fn upsert(&self, record: &FileRecord) -> Result<(), AppError> {
        self.records
            .write()
            .await
            .insert(record.job_id.clone(), record.clone());
        Ok(())
    }

    async fn get(&self, job_id: &str) -> Result<Option<FileRecord>, AppError> {
        Ok(self.records.read().await.get(job_id).cloned())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use filegate_core::ValidationStatus;

    fn record(job_id: &str, message: &str) -> FileRecord {
        FileRecord {
            job_id: job_id.to_string(),
            original_file_name: "a.json".to_string(),
            storage_key: "abc-a.json".to_string(),
            file_size_bytes: 12,
            processing_timestamp: Utc::now(),
            validation_status: ValidationStatus::Valid,
            validation_message: message.to_string(),
            source_bucket: "uploads".to_string(),
        }
    }

    #[tokio::test]
    async fn upsert_then_get() {
        let store = MemoryMetadataStore::new();
        assert!(store.is_empty().await);

        store.upsert(&record("J1", "Valid")).await.unwrap();
        let fetched = store.get("J1").await.unwrap().unwrap();
        assert_eq!(fetched.validation_message, "Valid");
        assert!(store.get("J2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn same_job_id_is_last_write_wins() {
        let store = MemoryMetadataStore::new();
        store.upsert(&record("J1", "first")).await.unwrap();
        store.upsert(&record("J1", "second")).await.unwrap();

        assert_eq!(store.len().await, 1);
        assert_eq!(
            store.get("J1").await.unwrap().unwrap().validation_message,
            "second"
        );
    }
}
