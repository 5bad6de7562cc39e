use crate::error::{HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use filegate_core::models::{UploadUrlRequest, UploadUrlResponse};
use filegate_infra::ErrorResponse;
use std::sync::Arc;

pub const UPLOAD_URL_MESSAGE: &str = "Pre-signed URL generated successfully";

/// Generate a presigned URL for direct upload to the input bucket
#[utoipa::path(
    post,
    path = "/api/v0/uploads/presigned",
    tag = "uploads",
    request_body = UploadUrlRequest,
    responses(
        (status = 200, description = "Presigned URL generated", body = UploadUrlResponse),
        (status = 400, description = "Invalid JSON, missing filename, or filename not usable as a key", body = ErrorResponse),
        (status = 413, description = "Request body too large", body = ErrorResponse),
        (status = 500, description = "Signing failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all, fields(filename = ?request.filename, operation = "generate_upload_url"))]
pub async fn generate_upload_url(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<UploadUrlRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let credential = state.issuer.issue(request.filename.as_deref()).await?;

    Ok(Json(UploadUrlResponse {
        message: UPLOAD_URL_MESSAGE.to_string(),
        upload_url: credential.upload_url,
        file_key: credential.file_key,
        expires_at: credential.expires_at,
    }))
}
