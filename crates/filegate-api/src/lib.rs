//! Filegate API Library
//!
//! HTTP handlers, the upload credential service, and application setup.

mod api_doc;
pub mod constants;
mod handlers;
pub mod services;
pub mod setup;

pub mod error;
pub mod state;

pub use error::HttpAppError;
pub use setup::routes::setup_routes;
pub use state::AppState;
