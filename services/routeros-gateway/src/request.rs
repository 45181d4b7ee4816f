//! Request bodies accepted by the gateway.

use crate::error::GatewayError;
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Router address and credentials.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionRequest {
    pub host: String,
    pub port: String,
    pub user: String,
    /// Empty when omitted; the factory `admin` account has no password.
    #[serde(default)]
    pub password: String,
}

impl ConnectionRequest {
    /// `host:port`, with IPv6 literals bracketed
    pub fn address(&self) -> String {
        let host = self.host.trim();
        if host.contains(':') && !host.starts_with('[') {
            format!("[{}]:{}", host, self.port.trim())
        } else {
            format!("{}:{}", host, self.port.trim())
        }
    }
}

impl fmt::Debug for ConnectionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionRequest")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Router connection plus one command to run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRequest {
    #[serde(flatten)]
    pub connection: ConnectionRequest,
    pub command: String,
    /// Named arguments; `null` and absent both mean none.
    #[serde(default)]
    pub payload: Option<HashMap<String, String>>,
}

impl CommandRequest {
    /// API words for the argument-taking run: the command followed by one
    /// `=key=value` word per payload entry.
    ///
    /// Returns `None` when there is no payload, in which case the command is
    /// run on its own.
    pub fn arguments(&self) -> Option<Vec<String>> {
        let payload = self.payload.as_ref().filter(|p| !p.is_empty())?;

        let mut words = Vec::with_capacity(payload.len() + 1);
        words.push(self.command.clone());
        words.extend(payload.iter().map(|(key, value)| format!("={}={}", key, value)));
        Some(words)
    }

    /// Payload rendered as JSON for log lines
    pub fn payload_json(&self) -> String {
        serde_json::to_string(&self.payload).unwrap_or_default()
    }
}

/// Decode a request body. The content type is not checked.
///
/// Only a JSON object is accepted; derived deserializers would otherwise take
/// an array of field values in declaration order.
pub fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, GatewayError> {
    let value: Value = serde_json::from_slice(body)?;
    if !value.is_object() {
        return Err(GatewayError::InvalidJson(de::Error::custom(
            "expected a JSON object",
        )));
    }
    Ok(serde_json::from_value(value)?)
}
