//! Application services used by the HTTP handlers.

pub mod upload_credentials;

pub use upload_credentials::{UploadCredential, UploadCredentialIssuer};
