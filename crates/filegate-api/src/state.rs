//! Shared application state handed to every handler.

use std::sync::Arc;

use filegate_core::Config;
use filegate_db::MetadataStore;
use filegate_processing::FileProcessor;
use filegate_storage::Storage;

use crate::services::UploadCredentialIssuer;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    pub records: Arc<dyn MetadataStore>,
    pub processor: FileProcessor,
    pub issuer: UploadCredentialIssuer,
}

impl AppState {
    /// Wire the processor and issuer around the given backends.
    pub fn new(config: Config, storage: Arc<dyn Storage>, records: Arc<dyn MetadataStore>) -> Self {
        let processor = FileProcessor::new(
            storage.clone(),
            records.clone(),
            config.quarantine_bucket.clone(),
        );
        let issuer = UploadCredentialIssuer::new(
            storage.clone(),
            config.input_bucket.clone(),
            std::time::Duration::from_secs(config.upload_url_expiry_secs),
        );

        Self {
            config,
            storage,
            records,
            processor,
            issuer,
        }
    }
}
