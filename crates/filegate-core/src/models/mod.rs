//! Data models shared by the API, the processing pipeline and the stores.

mod event;
mod file_record;
mod upload;

pub use event::*;
pub use file_record::*;
pub use upload::*;
