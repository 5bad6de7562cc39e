//! Filegate Processing Library
//!
//! Content validation, metadata extraction and the processing pipeline that
//! ties them to object storage and the record store.

pub mod extractor;
pub mod processor;
pub mod validator;

pub use extractor::{extract_job_id, extract_metadata, ExtractedMetadata};
pub use processor::{quarantine_key, EventOutcome, FileProcessor, ProcessOutcome, QUARANTINE_PREFIX};
pub use validator::{ContentValidator, KeywordValidator, ValidationOutcome};
