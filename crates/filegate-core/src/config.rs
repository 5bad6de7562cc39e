//! Configuration module
//!
//! Process-wide settings fixed at startup: bucket names, record table identity,
//! backend selection and HTTP server settings. Missing required values are a
//! [`AppError::Configuration`] and abort startup.

use std::env;
use std::str::FromStr;

use crate::error::AppError;
use crate::storage_types::{MetadataBackend, StorageBackend};

// Common constants
const SERVER_PORT: u16 = 4000;
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const UPLOAD_URL_EXPIRY_SECS: u64 = 300;
const MAX_UPLOAD_URL_EXPIRY_SECS: u64 = 7 * 24 * 60 * 60;
const MAX_EVENT_BODY_BYTES: usize = 1024 * 1024;
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;

static TABLE_NAME_PATTERN: std::sync::LazyLock<regex::Regex> = std::sync::LazyLock::new(|| {
    regex::Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}$").expect("table name pattern is valid")
});

/// True when `name` can be spliced into SQL as a table identifier.
pub fn is_sql_identifier(name: &str) -> bool {
    TABLE_NAME_PATTERN.is_match(name)
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub log_format: LogFormat,
    pub max_event_body_bytes: usize,
    pub http_concurrency_limit: usize,
    // Buckets
    pub input_bucket: String,
    pub quarantine_bucket: String,
    pub upload_url_expiry_secs: u64,
    // Object storage backend
    pub storage_backend: StorageBackend,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, etc.)
    pub local_storage_path: Option<String>,
    // Record store
    pub metadata_backend: MetadataBackend,
    pub metadata_table: String,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
}

fn required(name: &str) -> Result<String, AppError> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Configuration(format!("{} must be set", name)))
}

fn optional(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Unset or blank falls back to `default`; anything else must parse.
fn parse_number<T: FromStr>(name: &str, value: Option<String>, default: T) -> Result<T, AppError> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| AppError::Configuration(format!("{} must be a valid number", name))),
    }
}

fn numeric<T: FromStr>(name: &str, default: T) -> Result<T, AppError> {
    parse_number(name, optional(name), default)
}

impl Config {
    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let log_format = match optional("LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        let storage_backend = optional("STORAGE_BACKEND")
            .map(|s| s.parse::<StorageBackend>())
            .transpose()
            .map_err(|e| AppError::Configuration(e.to_string()))?
            .unwrap_or(StorageBackend::S3);

        let metadata_backend = optional("METADATA_BACKEND")
            .map(|s| s.parse::<MetadataBackend>())
            .transpose()
            .map_err(|e| AppError::Configuration(e.to_string()))?
            .unwrap_or(MetadataBackend::Postgres);

        let metadata_table = required("METADATA_TABLE_NAME")
            .or_else(|_| required("DYNAMODB_TABLE_NAME"))
            .map_err(|_| AppError::Configuration("METADATA_TABLE_NAME must be set".to_string()))?;

        let config = Config {
            server_port: numeric("PORT", SERVER_PORT)?,
            environment,
            log_format,
            max_event_body_bytes: numeric("MAX_EVENT_BODY_BYTES", MAX_EVENT_BODY_BYTES)?,
            http_concurrency_limit: numeric("HTTP_CONCURRENCY_LIMIT", HTTP_CONCURRENCY_LIMIT)?,
            input_bucket: required("S3_INPUT_BUCKET_NAME")?,
            quarantine_bucket: required("S3_QUARANTINE_BUCKET_NAME")?,
            upload_url_expiry_secs: numeric("UPLOAD_URL_EXPIRY_SECS", UPLOAD_URL_EXPIRY_SECS)?,
            storage_backend,
            s3_region: optional("S3_REGION").or_else(|| optional("AWS_REGION")),
            s3_endpoint: optional("S3_ENDPOINT"),
            local_storage_path: optional("LOCAL_STORAGE_PATH"),
            metadata_backend,
            metadata_table,
            database_url: optional("DATABASE_URL"),
            db_max_connections: numeric("DB_MAX_CONNECTIONS", MAX_CONNECTIONS)?,
            db_timeout_seconds: numeric("DB_TIMEOUT_SECONDS", CONNECTION_TIMEOUT_SECS)?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.input_bucket.is_empty() {
            return Err(AppError::Configuration(
                "S3_INPUT_BUCKET_NAME must be set".to_string(),
            ));
        }

        if self.quarantine_bucket.is_empty() {
            return Err(AppError::Configuration(
                "S3_QUARANTINE_BUCKET_NAME must be set".to_string(),
            ));
        }

        if !is_sql_identifier(&self.metadata_table) {
            return Err(AppError::Configuration(format!(
                "METADATA_TABLE_NAME '{}' must be a plain SQL identifier (letters, digits, underscore)",
                self.metadata_table
            )));
        }

        if self.upload_url_expiry_secs == 0 || self.upload_url_expiry_secs > MAX_UPLOAD_URL_EXPIRY_SECS
        {
            return Err(AppError::Configuration(format!(
                "UPLOAD_URL_EXPIRY_SECS must be between 1 and {}",
                MAX_UPLOAD_URL_EXPIRY_SECS
            )));
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_region.is_none() {
                    return Err(AppError::Configuration(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                            .to_string(),
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(AppError::Configuration(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                            .to_string(),
                    ));
                }
            }
            StorageBackend::Memory => {}
        }

        if self.metadata_backend == MetadataBackend::Postgres {
            match self.database_url.as_deref() {
                Some(url) if url.starts_with("postgres://") || url.starts_with("postgresql://") => {}
                Some(_) => {
                    return Err(AppError::Configuration(
                        "DATABASE_URL must be a valid PostgreSQL connection string".to_string(),
                    ))
                }
                None => {
                    return Err(AppError::Configuration(
                        "DATABASE_URL must be set when using postgres metadata backend"
                            .to_string(),
                    ))
                }
            }

            if self.db_max_connections == 0 {
                return Err(AppError::Configuration(
                    "DB_MAX_CONNECTIONS cannot be 0".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Every bucket the process may touch. Storage backends are built for
    /// exactly this set at startup.
    pub fn buckets(&self) -> Vec<String> {
        let mut buckets = vec![self.input_bucket.clone()];
        if self.quarantine_bucket != self.input_bucket {
            buckets.push(self.quarantine_bucket.clone());
        }
        buckets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            server_port: 4000,
            environment: "development".to_string(),
            log_format: LogFormat::Pretty,
            max_event_body_bytes: MAX_EVENT_BODY_BYTES,
            http_concurrency_limit: HTTP_CONCURRENCY_LIMIT,
            input_bucket: "uploads".to_string(),
            quarantine_bucket: "quarantine".to_string(),
            upload_url_expiry_secs: 300,
            storage_backend: StorageBackend::Memory,
            s3_region: None,
            s3_endpoint: None,
            local_storage_path: None,
            metadata_backend: MetadataBackend::Memory,
            metadata_table: "file_records".to_string(),
            database_url: None,
            db_max_connections: 10,
            db_timeout_seconds: 30,
        }
    }

    #[test]
    fn memory_backends_validate() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn s3_backend_requires_region() {
        let mut config = test_config();
        config.storage_backend = StorageBackend::S3;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));

        config.s3_region = Some("eu-west-1".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn postgres_backend_requires_database_url() {
        let mut config = test_config();
        config.metadata_backend = MetadataBackend::Postgres;
        assert!(config.validate().is_err());

        config.database_url = Some("mysql://localhost/db".to_string());
        assert!(config.validate().is_err());

        config.database_url = Some("postgres://localhost/filegate".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn table_name_must_be_identifier() {
        let mut config = test_config();
        config.metadata_table = "file_records; DROP TABLE x".to_string();
        assert!(config.validate().is_err());

        config.metadata_table = "JobMetadata_v2".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn expiry_window_is_bounded() {
        let mut config = test_config();
        config.upload_url_expiry_secs = 0;
        assert!(config.validate().is_err());
        config.upload_url_expiry_secs = MAX_UPLOAD_URL_EXPIRY_SECS + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn numeric_settings_reject_garbage() {
        assert_eq!(parse_number("UPLOAD_URL_EXPIRY_SECS", None, 300u64).unwrap(), 300);
        assert_eq!(
            parse_number("UPLOAD_URL_EXPIRY_SECS", Some("900".to_string()), 300u64).unwrap(),
            900
        );

        for raw in ["5m", "-1", "1.5"] {
            match parse_number("UPLOAD_URL_EXPIRY_SECS", Some(raw.to_string()), 300u64) {
                Err(AppError::Configuration(msg)) => {
                    assert_eq!(msg, "UPLOAD_URL_EXPIRY_SECS must be a valid number")
                }
                other => panic!("expected Configuration error for {:?}, got {:?}", raw, other),
            }
        }
        assert!(parse_number("PORT", Some("70000".to_string()), SERVER_PORT).is_err());
    }

    #[test]
    fn buckets_are_deduplicated() {
        let mut config = test_config();
        assert_eq!(config.buckets(), vec!["uploads", "quarantine"]);
        config.quarantine_bucket = "uploads".to_string();
        assert_eq!(config.buckets(), vec!["uploads"]);
    }

    #[test]
    fn production_detection() {
        let mut config = test_config();
        assert!(!config.is_production());
        config.environment = "PROD".to_string();
        assert!(config.is_production());
    }
}
