//! Gateway error types.
//!
//! Each request-level error maps to one HTTP status. Only dial failures expose
//! their cause in the response body; command failures are reported to the
//! caller generically and logged in full.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use routeros_client::RouterOSError;
use thiserror::Error;

/// Errors that can occur in the gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Request body is not the expected JSON shape
    #[error("invalid json: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Router unreachable or credentials rejected
    #[error("connection failed: {0}")]
    ConnectionFailed(#[source] RouterOSError),

    /// Router rejected or failed the command
    #[error("command failed: {0}")]
    CommandFailed(#[source] RouterOSError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Metrics registry error
    #[error("Metrics error: {0}")]
    Metrics(String),

    /// Request task panicked or was aborted
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<prometheus::Error> for GatewayError {
    fn from(e: prometheus::Error) -> Self {
        GatewayError::Metrics(e.to_string())
    }
}

impl GatewayError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            GatewayError::ConnectionFailed(_) => StatusCode::BAD_GATEWAY,
            GatewayError::CommandFailed(_)
            | GatewayError::InvalidConfig(_)
            | GatewayError::Metrics(_)
            | GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text written to the response body
    pub fn public_message(&self) -> String {
        match self {
            GatewayError::InvalidJson(_) => "invalid json".to_string(),
            GatewayError::ConnectionFailed(e) => format!("connection failed: {}", e),
            GatewayError::CommandFailed(_) => "command failed".to_string(),
            GatewayError::InvalidConfig(_) | GatewayError::Metrics(_) | GatewayError::Internal(_) => {
                "internal server error".to_string()
            }
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status_code(), self.public_message()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_json_is_bad_request() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = GatewayError::from(err);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.public_message(), "invalid json");
    }

    #[test]
    fn test_connection_failure_exposes_cause() {
        let err = GatewayError::ConnectionFailed(RouterOSError::Authentication(
            "router rejected user admin".to_string(),
        ));
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            err.public_message(),
            "connection failed: Authentication failed: router rejected user admin"
        );
    }

    #[test]
    fn test_command_failure_hides_cause() {
        let err = GatewayError::CommandFailed(RouterOSError::Trap {
            message: "no such command".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "command failed");
        // full detail stays available for logs
        assert!(err.to_string().contains("no such command"));
    }
}
