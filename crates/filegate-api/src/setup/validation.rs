//! Configuration validation
//!
//! Validates critical configuration values at startup to catch misconfigurations early.

use anyhow::Result;
use filegate_core::{Config, MetadataBackend, StorageBackend};

/// Validate critical configuration values
///
/// Hard errors come from `Config::validate`; setups that run but lose data
/// on restart are only warned about.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    if config.is_production() {
        if config.storage_backend == StorageBackend::Memory {
            tracing::warn!("In-memory object storage in production - uploads are lost on restart");
        }
        if config.metadata_backend == MetadataBackend::Memory {
            tracing::warn!("In-memory metadata store in production - records are lost on restart");
        }
    }

    if config.input_bucket == config.quarantine_bucket {
        tracing::warn!(
            bucket = %config.input_bucket,
            "Input and quarantine buckets are the same - quarantined copies land beside uploads"
        );
    }

    Ok(())
}
