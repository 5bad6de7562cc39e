//! Database setup and initialization

use anyhow::{Context, Result};
use filegate_core::{Config, MetadataBackend};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

/// Connect the PostgreSQL pool when the record store needs one.
///
/// Returns `None` for the in-memory backend. The table itself is created by
/// the metadata store.
pub async fn setup_database(config: &Config) -> Result<Option<PgPool>> {
    if config.metadata_backend != MetadataBackend::Postgres {
        tracing::info!(backend = %config.metadata_backend, "Skipping database connection");
        return Ok(None);
    }

    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set when using postgres metadata backend")?;

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!(
        max_connections = config.db_max_connections,
        "Database connected successfully"
    );

    Ok(Some(pool))
}
