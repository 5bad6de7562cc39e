use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Separator between the random token and the client filename.
pub const KEY_SEPARATOR: char = '-';

/// Object-store key for an uploaded file: `<token>-<filename>`.
///
/// The token is a v4 UUID in its hyphen-less form, so splitting on the first
/// separator recovers the filename for every generated key. Keys that did not
/// come from [`UploadKey::generate`] are parsed the same way and may yield a
/// truncated filename.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct UploadKey(String);

impl UploadKey {
    pub fn generate(filename: &str) -> Self {
        let token = Uuid::new_v4().simple();
        UploadKey(format!("{}{}{}", token, KEY_SEPARATOR, filename))
    }

    /// Filename recovered from the key: everything after the first `-`, or the
    /// whole key when there is no separator.
    pub fn original_filename(&self) -> &str {
        match self.0.split_once(KEY_SEPARATOR) {
            Some((_, name)) => name,
            None => &self.0,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for UploadKey {
    fn from(key: String) -> Self {
        UploadKey(key)
    }
}

impl From<&str> for UploadKey {
    fn from(key: &str) -> Self {
        UploadKey(key.to_string())
    }
}

impl AsRef<str> for UploadKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UploadKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Request body for a presigned upload URL
#[derive(Debug, Deserialize, ToSchema)]
pub struct UploadUrlRequest {
    /// Client filename. Becomes the suffix of the generated key.
    #[serde(default)]
    pub filename: Option<String>,
}

/// Response containing the presigned URL and the key it is scoped to
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlResponse {
    pub message: String,
    /// Presigned PUT URL
    pub upload_url: String,
    /// Object key the upload will land at
    #[schema(value_type = String)]
    pub file_key: UploadKey,
    /// URL expiration time
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_key_recovers_filename() {
        let key = UploadKey::generate("report.csv");
        assert_eq!(key.original_filename(), "report.csv");

        let (token, _) = key.as_str().split_once(KEY_SEPARATOR).unwrap();
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn filename_with_separator_round_trips() {
        let key = UploadKey::generate("q3-sales-final.json");
        assert_eq!(key.original_filename(), "q3-sales-final.json");
    }

    #[test]
    fn keys_without_separator_are_their_own_filename() {
        let key = UploadKey::from("plainname.txt");
        assert_eq!(key.original_filename(), "plainname.txt");
    }

    #[test]
    fn foreign_keys_split_on_first_separator() {
        let key = UploadKey::from("abc-bad.csv");
        assert_eq!(key.original_filename(), "bad.csv");

        // A hyphenated token loses part of itself into the filename.
        let key = UploadKey::from("a-b-c-name.txt");
        assert_eq!(key.original_filename(), "b-c-name.txt");
    }

    #[test]
    fn two_keys_for_same_filename_differ() {
        assert_ne!(UploadKey::generate("x"), UploadKey::generate("x"));
    }

    #[test]
    fn serializes_as_plain_string() {
        let key = UploadKey::from("abc-bad.csv");
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"abc-bad.csv\"");
    }

    #[test]
    fn response_uses_camel_case() {
        let response = UploadUrlResponse {
            message: "Pre-signed URL generated successfully".to_string(),
            upload_url: "https://example.com/put".to_string(),
            file_key: UploadKey::from("abc-report.csv"),
            expires_at: Utc::now(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["fileKey"], "abc-report.csv");
        assert_eq!(json["uploadUrl"], "https://example.com/put");
        assert!(json.get("expiresAt").is_some());
    }
}
