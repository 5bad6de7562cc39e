use crate::error::{HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, response::Response, Json};
use filegate_core::{ProcessedFile, S3Event};
use filegate_processing::{EventOutcome, ProcessOutcome};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

pub const NO_RECORDS_MESSAGE: &str = "No S3 records found in the event";
pub const PROCESSED_MESSAGE: &str = "File processed successfully";

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FileProcessedResponse {
    pub message: String,
    #[serde(flatten)]
    pub file: ProcessedFile,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProcessingFailedResponse {
    pub message: String,
    pub error: String,
}

/// Process an object-created notification
///
/// Only the first record is processed. Pipeline failures are reported in the
/// body with a 500; they have already been logged as failure records.
#[utoipa::path(
    post,
    path = "/api/v0/events/s3",
    tag = "events",
    request_body = S3Event,
    responses(
        (status = 200, description = "File processed (valid or invalid)", body = FileProcessedResponse),
        (status = 400, description = "Event without records, or invalid JSON", body = MessageResponse),
        (status = 413, description = "Request body too large", body = MessageResponse),
        (status = 500, description = "Processing failed", body = ProcessingFailedResponse)
    )
)]
#[tracing::instrument(skip_all, fields(records = event.records.len(), operation = "process_event"))]
pub async fn process_event(
    State(state): State<Arc<AppState>>,
    ValidatedJson(event): ValidatedJson<S3Event>,
) -> Result<Response, HttpAppError> {
    let response = match state.processor.handle_event(&event).await {
        EventOutcome::NoRecords => (
            StatusCode::BAD_REQUEST,
            Json(MessageResponse {
                message: NO_RECORDS_MESSAGE.to_string(),
            }),
        )
            .into_response(),
        EventOutcome::Completed(ProcessOutcome::Processed(file)) => (
            StatusCode::OK,
            Json(FileProcessedResponse {
                message: PROCESSED_MESSAGE.to_string(),
                file,
            }),
        )
            .into_response(),
        EventOutcome::Completed(ProcessOutcome::Failed { s3_key, error }) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ProcessingFailedResponse {
                message: format!("Error processing file {}", s3_key),
                error,
            }),
        )
            .into_response(),
    };

    Ok(response)
}
