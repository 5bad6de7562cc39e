//! Filegate Infrastructure Library
//!
//! Shared infrastructure used by the HTTP service and the CLI:
//! - Middleware (request ID, upload CORS headers, security headers)
//! - Tracing initialization
//! - Error response body

#[cfg(feature = "middleware")]
pub mod middleware;

#[cfg(feature = "observability-basic")]
pub mod telemetry;

pub mod error;

// Re-export commonly used types
#[cfg(feature = "middleware")]
pub use middleware::{
    get_request_id, request_id_middleware, security_headers_middleware, upload_cors_middleware,
    RequestId,
};

#[cfg(feature = "observability-basic")]
pub use telemetry::init_telemetry;

pub use error::ErrorResponse;
