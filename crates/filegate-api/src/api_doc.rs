//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::handlers;
use filegate_core::models;
use filegate_infra::ErrorResponse;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Filegate API",
        version = "0.1.0",
        description = "Upload intake API (v0): presigned upload URLs, processing of object-created notifications, and lookup of the stored file records. All endpoints are versioned under /api/v0/."
    ),
    paths(
        handlers::uploads::generate_upload_url,
        handlers::events::process_event,
        handlers::records::get_record,
    ),
    components(
        schemas(
            models::UploadUrlRequest,
            models::UploadUrlResponse,
            models::S3Event,
            models::S3EventRecord,
            models::S3Entity,
            models::S3Bucket,
            models::S3Object,
            models::ProcessedFile,
            models::FileRecord,
            models::ValidationStatus,
            handlers::events::MessageResponse,
            handlers::events::FileProcessedResponse,
            handlers::events::ProcessingFailedResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "uploads", description = "Presigned upload URLs for the input bucket"),
        (name = "events", description = "Object-created notifications"),
        (name = "records", description = "Stored processing records"),
    )
)]
pub struct ApiDoc;
