use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use filegate_core::{AppError, FileRecord};
use filegate_infra::ErrorResponse;
use std::sync::Arc;

/// Get the stored record for a JobId
#[utoipa::path(
    get,
    path = "/api/v0/records/{job_id}",
    tag = "records",
    params(
        ("job_id" = String, Path, description = "JobId, or the storage key for failed files")
    ),
    responses(
        (status = 200, description = "Record found", body = FileRecord),
        (status = 404, description = "No record for this JobId", body = ErrorResponse),
        (status = 500, description = "Record store unavailable", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn get_record(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let record = state
        .records
        .get(&job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No record for JobId {}", job_id)))?;

    Ok(Json(record))
}
