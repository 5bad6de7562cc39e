use anyhow::Context;
use filegate_processing::{EventOutcome, ProcessOutcome};
use serde::Serialize;
use serde_json::{json, Value};

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

pub fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

/// Same body the HTTP event endpoint returns for this outcome.
pub fn outcome_json(outcome: &EventOutcome) -> Value {
    match outcome {
        EventOutcome::NoRecords => json!({ "message": "No S3 records found in the event" }),
        EventOutcome::Completed(ProcessOutcome::Processed(file)) => json!({
            "message": "File processed successfully",
            "s3Key": file.s3_key,
            "isValid": file.is_valid,
            "validationMessage": file.validation_message,
            "jobId": file.job_id,
        }),
        EventOutcome::Completed(ProcessOutcome::Failed { s3_key, error }) => json!({
            "message": format!("Error processing file {}", s3_key),
            "error": error,
        }),
    }
}
