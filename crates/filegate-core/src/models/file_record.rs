use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// JobId used when the content carries none.
pub const UNKNOWN_JOB_ID: &str = "UNKNOWN";

/// Outcome of processing one uploaded object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationStatus {
    Valid,
    Invalid,
    ProcessingFailed,
}

impl ValidationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationStatus::Valid => "VALID",
            ValidationStatus::Invalid => "INVALID",
            ValidationStatus::ProcessingFailed => "PROCESSING_FAILED",
        }
    }

    pub fn from_validity(is_valid: bool) -> Self {
        if is_valid {
            ValidationStatus::Valid
        } else {
            ValidationStatus::Invalid
        }
    }
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValidationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VALID" => Ok(ValidationStatus::Valid),
            "INVALID" => Ok(ValidationStatus::Invalid),
            "PROCESSING_FAILED" => Ok(ValidationStatus::ProcessingFailed),
            other => Err(format!("Unknown validation status: {}", other)),
        }
    }
}

/// Persisted outcome of one processing attempt, keyed by `job_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct FileRecord {
    pub job_id: String,
    pub original_file_name: String,
    pub storage_key: String,
    pub file_size_bytes: i64,
    pub processing_timestamp: DateTime<Utc>,
    pub validation_status: ValidationStatus,
    pub validation_message: String,
    pub source_bucket: String,
}

impl FileRecord {
    /// Record written when processing aborted. The key doubles as the JobId.
    pub fn failure(
        key: &str,
        source_bucket: &str,
        original_file_name: &str,
        file_size_bytes: i64,
        error: &str,
    ) -> Self {
        FileRecord {
            job_id: key.to_string(),
            original_file_name: original_file_name.to_string(),
            storage_key: key.to_string(),
            file_size_bytes,
            processing_timestamp: Utc::now(),
            validation_status: ValidationStatus::ProcessingFailed,
            validation_message: error.to_string(),
            source_bucket: source_bucket.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_screaming_snake() {
        assert_eq!(
            serde_json::to_string(&ValidationStatus::ProcessingFailed).unwrap(),
            "\"PROCESSING_FAILED\""
        );
        assert_eq!(
            "INVALID".parse::<ValidationStatus>().unwrap(),
            ValidationStatus::Invalid
        );
        assert!("valid".parse::<ValidationStatus>().is_err());
    }

    #[test]
    fn record_uses_pascal_case_fields() {
        let record = FileRecord::failure("abc-x.csv", "uploads", "x.csv", 0, "boom");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["JobId"], "abc-x.csv");
        assert_eq!(json["StorageKey"], "abc-x.csv");
        assert_eq!(json["ValidationStatus"], "PROCESSING_FAILED");
        assert_eq!(json["ValidationMessage"], "boom");
        assert_eq!(json["SourceBucket"], "uploads");
        assert_eq!(json["FileSizeBytes"], 0);
    }
}
