//! Filegate CLI: operator commands that run against the configured backends
//! directly, without going through the HTTP service.
//!
//! Reads the same environment as the server (`S3_INPUT_BUCKET_NAME`, ...).

use anyhow::Context;
use clap::{Parser, Subcommand};
use filegate_api::setup::{database, storage};
use filegate_api::services::UploadCredentialIssuer;
use filegate_cli::{init_tracing, outcome_json, print_json};
use filegate_core::{Config, S3Event, UploadKey};
use filegate_processing::{EventOutcome, FileProcessor, ProcessOutcome};
use filegate_storage::Storage;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "filegate", about = "Filegate operator CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Issue a presigned upload URL for a filename
    Presign {
        /// Client filename; becomes the key suffix
        filename: String,
    },
    /// Run the processing pipeline for one stored object
    Process {
        /// Bucket holding the object (defaults to the input bucket)
        #[arg(long)]
        bucket: Option<String>,
        /// Object key
        key: String,
    },
    /// Replay a saved object-created notification
    Event {
        /// Path to the event JSON
        file: std::path::PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    let storage = storage::setup_storage(&config).await?;

    match cli.command {
        Commands::Presign { filename } => {
            let issuer = UploadCredentialIssuer::new(
                storage,
                config.input_bucket.clone(),
                Duration::from_secs(config.upload_url_expiry_secs),
            );
            let credential = issuer.issue(Some(&filename)).await?;
            print_json(&serde_json::json!({
                "fileKey": credential.file_key,
                "uploadUrl": credential.upload_url,
                "expiresAt": credential.expires_at,
            }))?;
        }
        Commands::Process { bucket, key } => {
            let processor = build_processor(&config, storage).await?;
            let bucket = bucket.unwrap_or_else(|| config.input_bucket.clone());
            let outcome = processor.process(&bucket, &UploadKey::from(key)).await;
            report(EventOutcome::Completed(outcome))?;
        }
        Commands::Event { file } => {
            let raw = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let event: S3Event = serde_json::from_str(&raw)
                .with_context(|| format!("{} is not a valid event notification", file.display()))?;
            let processor = build_processor(&config, storage).await?;
            report(processor.handle_event(&event).await)?;
        }
    }

    Ok(())
}

async fn build_processor(
    config: &Config,
    storage: Arc<dyn Storage>,
) -> anyhow::Result<FileProcessor> {
    let pool = database::setup_database(config).await?;
    let records = filegate_db::create_metadata_store(config, pool)
        .await
        .context("Failed to initialize metadata store")?;
    Ok(FileProcessor::new(
        storage,
        records,
        config.quarantine_bucket.clone(),
    ))
}

/// Print the outcome; anything but a processed file exits non-zero.
fn report(outcome: EventOutcome) -> anyhow::Result<()> {
    print_json(&outcome_json(&outcome))?;
    match outcome {
        EventOutcome::Completed(ProcessOutcome::Processed(_)) => Ok(()),
        EventOutcome::Completed(ProcessOutcome::Failed { s3_key, .. }) => {
            anyhow::bail!("Processing failed for {}", s3_key)
        }
        EventOutcome::NoRecords => anyhow::bail!("Event carries no records"),
    }
}
