//! Object-creation notifications and the processing result returned for them.
//!
//! Only the fields the pipeline reads are modelled; everything else in an S3
//! or MinIO notification is ignored during deserialization.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct S3Event {
    #[serde(rename = "Records", default)]
    pub records: Vec<S3EventRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct S3EventRecord {
    pub s3: S3Entity,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct S3Entity {
    pub bucket: S3Bucket,
    pub object: S3Object,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct S3Bucket {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct S3Object {
    /// Object key as delivered by the notification (not URL-decoded).
    pub key: String,
}

impl S3Event {
    /// Single-record event for the given object.
    pub fn for_object(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        S3Event {
            records: vec![S3EventRecord {
                s3: S3Entity {
                    bucket: S3Bucket { name: bucket.into() },
                    object: S3Object { key: key.into() },
                },
            }],
        }
    }
}

/// Summary of a file that went through the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedFile {
    pub s3_key: String,
    pub is_valid: bool,
    pub validation_message: String,
    pub job_id: String,
}
