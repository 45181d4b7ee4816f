//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of a successful `/connect`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectResponse {
    /// Always `connected`
    pub status: String,
}

impl ConnectResponse {
    /// Response for a reachable router
    pub fn connected() -> Self {
        Self {
            status: "connected".to_string(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `ok`
    pub status: String,
    /// Gateway crate version
    pub version: String,
    /// Time the check was answered
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    /// Create a healthy response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
        }
    }
}
