//! Filegate Core Library
//!
//! Domain models, error types and configuration shared across all filegate
//! crates.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{Config, LogFormat};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::*;
pub use storage_types::{MetadataBackend, StorageBackend};
