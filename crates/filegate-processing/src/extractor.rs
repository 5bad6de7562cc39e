//! Structured metadata pulled from file content and its storage key.

use chrono::{DateTime, Utc};
use filegate_core::{UploadKey, UNKNOWN_JOB_ID};
use serde_json::Value;

/// Metadata derived from one file, before validation results are merged in.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedMetadata {
    pub job_id: String,
    pub original_file_name: String,
    pub storage_key: String,
    pub file_size_bytes: i64,
    pub processing_timestamp: DateTime<Utc>,
}

/// Extract metadata. Never fails: unparseable content yields `UNKNOWN`.
pub fn extract_metadata(content: &str, key: &UploadKey) -> ExtractedMetadata {
    ExtractedMetadata {
        job_id: extract_job_id(content),
        original_file_name: key.original_filename().to_string(),
        storage_key: key.as_str().to_string(),
        file_size_bytes: content.len() as i64,
        processing_timestamp: Utc::now(),
    }
}

/// JobId of a JSON object document; `job_id` wins over `JobId`.
///
/// String values are returned unquoted. Any other value is returned as its
/// compact JSON text: `42` gives `"42"`, `true` gives `"true"` and `null`
/// gives `"null"`. Content that is not a JSON object, or lacks both fields,
/// gives `UNKNOWN`.
pub fn extract_job_id(content: &str) -> String {
    let parsed: Value = match serde_json::from_str(content) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(error = %e, "Content is not JSON, JobId unknown");
            return UNKNOWN_JOB_ID.to_string();
        }
    };

    let Value::Object(fields) = parsed else {
        return UNKNOWN_JOB_ID.to_string();
    };

    match fields.get("job_id").or_else(|| fields.get("JobId")) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => UNKNOWN_JOB_ID.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_id_from_snake_case_field() {
        let key = UploadKey::from("abc-data.json");
        let meta = extract_metadata(r#"{"job_id":"J1"}"#, &key);
        assert_eq!(meta.job_id, "J1");
        assert_eq!(meta.original_file_name, "data.json");
        assert_eq!(meta.storage_key, "abc-data.json");
        assert_eq!(meta.file_size_bytes, 15);
    }

    #[test]
    fn test_job_id_from_pascal_case_field() {
        assert_eq!(extract_job_id(r#"{"JobId":"J9"}"#), "J9");
    }

    #[test]
    fn test_snake_case_takes_precedence() {
        assert_eq!(extract_job_id(r#"{"JobId":"B","job_id":"A"}"#), "A");
    }

    #[test]
    fn test_non_string_values_are_stringified() {
        assert_eq!(extract_job_id(r#"{"job_id":42}"#), "42");
        assert_eq!(extract_job_id(r#"{"job_id":true}"#), "true");
        assert_eq!(extract_job_id(r#"{"job_id":null}"#), "null");
        assert_eq!(extract_job_id(r#"{"JobId":{"a":1}}"#), r#"{"a":1}"#);
    }

    #[test]
    fn test_unknown_when_absent_or_unparseable() {
        assert_eq!(extract_job_id(r#"{"other":1}"#), "UNKNOWN");
        assert_eq!(extract_job_id("job_id,name\n1,a"), "UNKNOWN");
        assert_eq!(extract_job_id(r#"["job_id"]"#), "UNKNOWN");
        assert_eq!(extract_job_id(""), "UNKNOWN");
    }

    #[test]
    fn test_size_is_utf8_byte_length() {
        let key = UploadKey::from("k");
        let meta = extract_metadata("é", &key);
        assert_eq!(meta.file_size_bytes, 2);
    }

    #[test]
    fn test_repeated_extraction_is_stable() {
        let key = UploadKey::from("abc-x-y.json");
        let content = r#"{"job_id":"J7"}"#;
        let a = extract_metadata(content, &key);
        let b = extract_metadata(content, &key);
        assert_eq!(a.job_id, b.job_id);
        assert_eq!(a.original_file_name, b.original_file_name);
        assert_eq!(a.original_file_name, "x-y.json");
        assert_eq!(a.file_size_bytes, b.file_size_bytes);
    }
}
