//! RouterOS REST API client
//!
//! Implements router sessions on top of the RouterOS v7 REST interface
//! (`/rest/...`). Each session is an HTTP client bound to one router address and
//! one set of credentials.

use crate::command::Command;
use crate::error::RouterOSError;
use crate::models::Reply;
use crate::routeros_trait::{RouterDialer, RouterSession};
use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

/// URL scheme used to reach the router's REST interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scheme {
    /// Plain HTTP (`www` service)
    #[default]
    Http,
    /// HTTPS (`www-ssl` service)
    Https,
}

impl Scheme {
    /// Scheme as written in a URL
    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Scheme::Http),
            "https" => Ok(Scheme::Https),
            other => Err(format!("unsupported scheme: {}", other)),
        }
    }
}

/// Transport settings applied to every dialed session
#[derive(Debug, Clone)]
pub struct DialOptions {
    /// Scheme of the router REST endpoint
    pub scheme: Scheme,
    /// Per-call timeout for dial and command requests
    pub timeout: Duration,
    /// Accept self-signed router certificates (HTTPS only)
    pub accept_invalid_certs: bool,
}

impl Default for DialOptions {
    fn default() -> Self {
        Self {
            scheme: Scheme::Http,
            timeout: Duration::from_secs(8),
            accept_invalid_certs: false,
        }
    }
}

/// Dialer producing REST-backed sessions
#[derive(Debug, Clone, Default)]
pub struct RestDialer {
    options: DialOptions,
}

impl RestDialer {
    /// Create a dialer with the given transport settings
    pub fn new(options: DialOptions) -> Self {
        Self { options }
    }

    /// Transport settings used for new sessions
    pub fn options(&self) -> &DialOptions {
        &self.options
    }
}

#[async_trait::async_trait]
impl RouterDialer for RestDialer {
    async fn dial(
        &self,
        address: &str,
        username: &str,
        password: &str,
    ) -> Result<Box<dyn RouterSession>, RouterOSError> {
        let session = RouterOSClient::connect(address, username, password, &self.options).await?;
        Ok(Box::new(session))
    }
}

/// Error body returned by the REST interface
#[derive(Debug, Deserialize)]
struct RestErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

/// RouterOS REST API session
pub struct RouterOSClient {
    client: Client,
    base_url: String,
    address: String,
    username: String,
    password: String,
    session_id: Uuid,
    closed: bool,
}

impl fmt::Debug for RouterOSClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterOSClient")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("session_id", &self.session_id)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

impl RouterOSClient {
    /// Create a client for `address` without contacting the router
    ///
    /// # Arguments
    /// * `address` - Router address as `host:port`
    /// * `username` - RouterOS user
    /// * `password` - RouterOS password
    /// * `options` - Transport settings
    pub fn new(
        address: &str,
        username: &str,
        password: &str,
        options: &DialOptions,
    ) -> Result<Self, RouterOSError> {
        let base_url = rest_base_url(options.scheme, address)?;

        let client = Client::builder()
            .timeout(options.timeout)
            .connect_timeout(options.timeout)
            .danger_accept_invalid_certs(options.accept_invalid_certs)
            .build()?;

        Ok(Self {
            client,
            base_url,
            address: address.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            session_id: Uuid::new_v4(),
            closed: false,
        })
    }

    /// Create a client and verify reachability and credentials.
    ///
    /// # Returns
    /// * `Ok(RouterOSClient)` - The router answered and accepted the credentials
    /// * `Err(RouterOSError)` - The router is unreachable or rejected the login
    pub async fn connect(
        address: &str,
        username: &str,
        password: &str,
        options: &DialOptions,
    ) -> Result<Self, RouterOSError> {
        let client = Self::new(address, username, password, options)?;
        let identity = client.identity().await?;
        debug!(
            session = %client.session_id,
            address = %client.address,
            identity = %identity,
            "Opened RouterOS session"
        );
        Ok(client)
    }

    /// Base URL of the REST interface, e.g. `http://192.168.88.1:80/rest`
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Identifier used to correlate this session's log lines
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Whether `close` has been called
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Fetch the router's system identity name
    pub async fn identity(&self) -> Result<String, RouterOSError> {
        let url = format!("{}/system/identity", self.base_url);
        debug!(session = %self.session_id, "GET {}", url);

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.username, Some(&self.password))
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(RouterOSError::Authentication(format!(
                "router {} rejected user {}",
                self.address, self.username
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RouterOSError::Api(format!(
                "GET /system/identity failed: {} - {}",
                status, body
            )));
        }

        let value: Value = response.json().await?;
        Ok(value
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string())
    }

    /// Execute a parsed command
    pub async fn execute(&self, command: &Command) -> Result<Reply, RouterOSError> {
        if self.closed {
            return Err(RouterOSError::SessionClosed);
        }

        let url = format!("{}{}", self.base_url, command.path());
        let body = command.rest_body();
        debug!(session = %self.session_id, "POST {} with body: {}", url, body);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.username, Some(&self.password))
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(error_for_status(status, response, &self.username).await);
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Reply::from_rest(Value::Null));
        }
        let value: Value = serde_json::from_str(&text)?;
        Ok(Reply::from_rest(value))
    }
}

#[async_trait::async_trait]
impl RouterSession for RouterOSClient {
    fn address(&self) -> &str {
        &self.address
    }

    async fn run(&mut self, command: &str) -> Result<Reply, RouterOSError> {
        let command = Command::parse(&[command])?;
        self.execute(&command).await
    }

    async fn run_args(&mut self, words: &[String]) -> Result<Reply, RouterOSError> {
        let command = Command::parse(words)?;
        self.execute(&command).await
    }

    async fn close(&mut self) -> Result<(), RouterOSError> {
        if !self.closed {
            self.closed = true;
            debug!(session = %self.session_id, address = %self.address, "Closed RouterOS session");
        }
        Ok(())
    }
}

/// Build the REST base URL for a `host:port` address
fn rest_base_url(scheme: Scheme, address: &str) -> Result<String, RouterOSError> {
    if address.is_empty() || address.contains(['/', '@', '?', '#']) || address.contains(char::is_whitespace) {
        return Err(RouterOSError::InvalidAddress(address.to_string()));
    }

    let base_url = format!("{}://{}/rest", scheme, address);
    let parsed = Url::parse(&base_url)
        .map_err(|e| RouterOSError::InvalidAddress(format!("{}: {}", address, e)))?;
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(RouterOSError::InvalidAddress(address.to_string()));
    }

    Ok(base_url)
}

async fn error_for_status(status: StatusCode, response: Response, username: &str) -> RouterOSError {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return RouterOSError::Authentication(format!("router rejected user {}", username));
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<RestErrorBody>(&text)
        .ok()
        .and_then(|body| match (body.message, body.detail) {
            (Some(message), Some(detail)) => Some(format!("{}: {}", message, detail)),
            (message, detail) => detail.or(message),
        })
        .unwrap_or_else(|| format!("{} - {}", status, text));

    RouterOSError::Trap { message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_parsing() {
        assert_eq!("http".parse::<Scheme>().unwrap(), Scheme::Http);
        assert_eq!(" HTTPS ".parse::<Scheme>().unwrap(), Scheme::Https);
        assert!("ftp".parse::<Scheme>().is_err());
    }

    #[test]
    fn test_rest_base_url() {
        assert_eq!(
            rest_base_url(Scheme::Http, "192.168.88.1:80").unwrap(),
            "http://192.168.88.1:80/rest"
        );
        assert_eq!(
            rest_base_url(Scheme::Https, "[fe80::1]:443").unwrap(),
            "https://[fe80::1]:443/rest"
        );
    }

    #[test]
    fn test_rest_base_url_rejects_bad_addresses() {
        for address in ["", ":80", "host/path:80", "user@host:80", "host name:80", "host:notaport"] {
            assert!(
                matches!(rest_base_url(Scheme::Http, address), Err(RouterOSError::InvalidAddress(_))),
                "address {:?} should be rejected",
                address
            );
        }
    }

    #[tokio::test]
    async fn test_closed_session_refuses_commands() {
        let mut client =
            RouterOSClient::new("127.0.0.1:1", "admin", "", &DialOptions::default()).unwrap();

        client.close().await.unwrap();
        assert!(client.is_closed());
        // second close is a no-op
        client.close().await.unwrap();

        let result = client.run("/system/resource/print").await;
        assert!(matches!(result, Err(RouterOSError::SessionClosed)));
    }

    #[test]
    fn test_debug_hides_password() {
        let client =
            RouterOSClient::new("10.0.0.1:80", "admin", "s3cret", &DialOptions::default()).unwrap();
        let rendered = format!("{:?}", client);
        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("admin"));
    }
}
