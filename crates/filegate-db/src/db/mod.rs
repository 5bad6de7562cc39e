//! Record store repositories
//!
//! `MetadataStore` is the seam the processing pipeline writes through.
//! PostgreSQL backs it in deployment, an in-memory map in development and tests.

pub mod file_record;
pub mod memory;

pub use file_record::{MetadataStore, PostgresMetadataStore};
pub use memory::MemoryMetadataStore;

use std::sync::Arc;

use filegate_core::{AppError, Config, MetadataBackend};
use sqlx::PgPool;

/// Build the record store selected by configuration.
///
/// The postgres backend needs a pool; the schema is created if missing.
pub async fn create_metadata_store(
    config: &Config,
    pool: Option<PgPool>,
) -> Result<Arc<dyn MetadataStore>, AppError> {
    match config.metadata_backend {
        MetadataBackend::Postgres => {
            let pool = pool.ok_or_else(|| {
                AppError::Configuration(
                    "Postgres metadata backend selected but no database pool available".to_string(),
                )
            })?;
            tracing::info!(table = %config.metadata_table, "Initializing PostgreSQL metadata store");
            let store = PostgresMetadataStore::new(pool, config.metadata_table.clone())?;
            store.ensure_schema().await?;
            Ok(Arc::new(store))
        }
        MetadataBackend::Memory => {
            tracing::info!("Initializing in-memory metadata store");
            Ok(Arc::new(MemoryMetadataStore::new()))
        }
    }
}
