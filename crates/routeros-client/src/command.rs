//! RouterOS command words
//!
//! Commands use the API word form: a menu path followed by attribute words
//! (`=name=value`) and query words (`?type=ether`). The REST interface accepts
//! the same command as `POST /rest<path>` with the attributes as a JSON object
//! and the queries under `.query`.

use crate::error::RouterOSError;
use serde_json::{Map, Value};

/// A parsed RouterOS command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    path: String,
    attributes: Vec<(String, String)>,
    queries: Vec<String>,
}

impl Command {
    /// Parse API words. The first word is the command path.
    ///
    /// The path may use either API form (`/ip/address/print`) or CLI spacing
    /// (`/ip address print`).
    pub fn parse<S: AsRef<str>>(words: &[S]) -> Result<Self, RouterOSError> {
        let (first, rest) = words
            .split_first()
            .ok_or_else(|| RouterOSError::InvalidCommand("empty command".to_string()))?;
        let path = normalize_path(first.as_ref())?;

        let mut attributes = Vec::new();
        let mut queries = Vec::new();
        for word in rest {
            let word = word.as_ref();
            if let Some(attribute) = word.strip_prefix('=') {
                let (key, value) = attribute.split_once('=').unwrap_or((attribute, ""));
                if key.is_empty() {
                    return Err(RouterOSError::InvalidCommand(format!(
                        "attribute word without a name: {}",
                        word
                    )));
                }
                attributes.push((key.to_string(), value.to_string()));
            } else if let Some(query) = word.strip_prefix('?') {
                if query.is_empty() {
                    return Err(RouterOSError::InvalidCommand("empty query word".to_string()));
                }
                queries.push(query.to_string());
            } else {
                return Err(RouterOSError::InvalidCommand(format!(
                    "unsupported word: {}",
                    word
                )));
            }
        }

        Ok(Self {
            path,
            attributes,
            queries,
        })
    }

    /// Menu path and command, e.g. `/interface/print`
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Named arguments in the order they were given
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Query words without their `?` prefix
    pub fn queries(&self) -> &[String] {
        &self.queries
    }

    /// JSON body for the REST call
    pub fn rest_body(&self) -> Value {
        let mut body = Map::new();
        for (key, value) in &self.attributes {
            body.insert(key.clone(), Value::String(value.clone()));
        }
        if !self.queries.is_empty() {
            body.insert(
                ".query".to_string(),
                Value::Array(self.queries.iter().cloned().map(Value::String).collect()),
            );
        }
        Value::Object(body)
    }
}

fn normalize_path(raw: &str) -> Result<String, RouterOSError> {
    let raw = raw.trim();
    if !raw.starts_with('/') {
        return Err(RouterOSError::InvalidCommand(format!(
            "command must start with '/': {}",
            raw
        )));
    }

    let segments: Vec<&str> = raw
        .split(|c: char| c == '/' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect();
    if segments.is_empty() {
        return Err(RouterOSError::InvalidCommand("command has no path".to_string()));
    }

    Ok(format!("/{}", segments.join("/")))
}
