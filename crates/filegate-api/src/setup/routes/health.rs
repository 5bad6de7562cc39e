//! Health check handlers and response types.

use crate::state::AppState;
use axum::{http::StatusCode, response::IntoResponse, Json};
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

/// Key that is never written; probing it exercises the bucket connection.
const PROBE_KEY: &str = "health-check-non-existent-key";

/// Run an async check with timeout; returns status string "healthy", "timeout", or "{prefix}: {error}".
async fn run_check<F, E>(timeout: Duration, f: F, error_prefix: &str) -> String
where
    F: Future<Output = Result<(), E>>,
    E: Display,
{
    match tokio::time::timeout(timeout, f).await {
        Ok(Ok(())) => "healthy".to_string(),
        Ok(Err(e)) => format!("{}: {}", error_prefix, e),
        Err(_) => "timeout".to_string(),
    }
}

#[derive(serde::Serialize)]
pub(super) struct HealthCheckResponse {
    pub status: String,
    pub record_store: String,
    pub input_bucket: String,
    pub quarantine_bucket: String,
}

/// Liveness probe - process is running.
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}

/// Readiness probe - the record store answers.
pub async fn readiness_check(state: Arc<AppState>) -> impl IntoResponse {
    let records = state.records.clone();
    let record_store = run_check(
        TIMEOUT,
        async move { records.health_check().await },
        "not_ready",
    )
    .await;

    let ready = record_store == "healthy";
    if !ready {
        tracing::error!(record_store = %record_store, "Readiness check failed");
    }

    let status_code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(serde_json::json!({
            "status": if ready { "ready" } else { "not_ready" },
            "record_store": record_store,
        })),
    )
}

/// Full health check: record store plus both buckets.
///
/// Bucket failures degrade the status without failing it; a dead record
/// store fails it.
pub async fn health_check(state: Arc<AppState>) -> impl IntoResponse {
    let records = state.records.clone();
    let record_store = run_check(
        TIMEOUT,
        async move { records.health_check().await },
        "unhealthy",
    )
    .await;

    let input_bucket = probe_bucket(&state, &state.config.input_bucket).await;
    let quarantine_bucket = probe_bucket(&state, &state.config.quarantine_bucket).await;

    let overall_healthy = record_store == "healthy";
    let status = if !overall_healthy {
        "unhealthy"
    } else if input_bucket != "healthy" || quarantine_bucket != "healthy" {
        "degraded"
    } else {
        "healthy"
    };

    let status_code = if overall_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(HealthCheckResponse {
            status: status.to_string(),
            record_store,
            input_bucket,
            quarantine_bucket,
        }),
    )
}

async fn probe_bucket(state: &AppState, bucket: &str) -> String {
    let storage = state.storage.clone();
    run_check(
        TIMEOUT,
        async move { storage.exists(bucket, PROBE_KEY).await.map(drop) },
        "degraded",
    )
    .await
}
