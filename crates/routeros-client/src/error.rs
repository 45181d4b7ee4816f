//! RouterOS client errors

use thiserror::Error;

/// Errors that can occur while talking to a RouterOS device
#[derive(Debug, Error)]
pub enum RouterOSError {
    /// HTTP transport error (DNS, TCP, TLS, timeout)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// RouterOS returned an unexpected response
    #[error("RouterOS API error: {0}")]
    Api(String),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Credentials were rejected by the router
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The router rejected the command (`!trap`)
    #[error("RouterOS trap: {message}")]
    Trap {
        /// Message reported by the router
        message: String,
    },

    /// The router address could not be turned into a URL
    #[error("Invalid router address: {0}")]
    InvalidAddress(String),

    /// The command words are not a valid RouterOS command
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// The session was already closed
    #[error("Session is closed")]
    SessionClosed,
}
