//! Application setup and initialization
//!
//! Everything `main` needs to go from a loaded `Config` to a serving router.

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use filegate_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    filegate_infra::init_telemetry(config.log_format)
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    // Fail fast on misconfiguration
    validation::validate_config(&config).context("Configuration validation failed")?;
    crate::error::set_production_mode(config.is_production());

    tracing::info!(
        environment = %config.environment,
        input_bucket = %config.input_bucket,
        quarantine_bucket = %config.quarantine_bucket,
        "Configuration loaded and validated successfully"
    );

    let pool = database::setup_database(&config).await?;
    let records = filegate_db::create_metadata_store(&config, pool)
        .await
        .context("Failed to initialize metadata store")?;
    let storage = storage::setup_storage(&config).await?;

    let state = Arc::new(AppState::new(config.clone(), storage, records));
    let router = routes::setup_routes(&config, state.clone());

    Ok((state, router))
}
