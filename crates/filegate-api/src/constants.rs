//! API constants

pub const API_VERSION: &str = "v0";

/// Prefix for every versioned route.
pub const API_PREFIX: &str = "/api/v0";
