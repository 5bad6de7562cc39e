//! Storage setup and initialization

use anyhow::{Context, Result};
use filegate_core::Config;
use filegate_storage::{create_storage, Storage};
use std::sync::Arc;

pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!("Initializing storage abstraction...");
    let storage = create_storage(config)
        .await
        .context("Failed to initialize object storage")?;
    tracing::info!(
        backend = ?storage.backend_type(),
        buckets = ?config.buckets(),
        "Storage abstraction initialized successfully"
    );
    Ok(storage)
}
