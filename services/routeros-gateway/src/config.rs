//! Gateway configuration.
//!
//! Configuration is read once at startup from environment variables. Every
//! variable has a default, so an empty environment yields a working gateway on
//! `0.0.0.0:8080`.

use crate::error::GatewayError;
use routeros_client::{DialOptions, Scheme};
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

/// Socket address to listen on
pub const LISTEN_ADDR_VAR: &str = "GATEWAY_LISTEN_ADDR";
/// Request body read timeout in seconds
pub const READ_TIMEOUT_VAR: &str = "GATEWAY_READ_TIMEOUT_SECS";
/// Request handling timeout in seconds
pub const WRITE_TIMEOUT_VAR: &str = "GATEWAY_WRITE_TIMEOUT_SECS";
/// `http` or `https` for router REST calls
pub const ROUTER_SCHEME_VAR: &str = "ROUTEROS_SCHEME";
/// Router call timeout in seconds
pub const ROUTER_TIMEOUT_VAR: &str = "ROUTEROS_TIMEOUT_SECS";
/// `true` to accept self-signed router certificates
pub const ROUTER_INSECURE_VAR: &str = "ROUTEROS_ACCEPT_INVALID_CERTS";

/// Runtime settings for the gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Address the HTTP server binds
    pub listen_addr: SocketAddr,
    /// Limit on reading a request body
    pub read_timeout: Duration,
    /// Limit on handling a request and producing its response
    pub write_timeout: Duration,
    /// Scheme used to reach routers
    pub router_scheme: Scheme,
    /// Per-call limit on router dial and command requests
    pub router_timeout: Duration,
    /// Skip TLS certificate checks on router connections
    pub router_accept_invalid_certs: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            read_timeout: Duration::from_secs(5),
            write_timeout: Duration::from_secs(10),
            router_scheme: Scheme::Http,
            router_timeout: Duration::from_secs(8),
            router_accept_invalid_certs: false,
        }
    }
}

impl GatewayConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, GatewayError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, GatewayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Ok(Self {
            listen_addr: parse_or(lookup(LISTEN_ADDR_VAR), LISTEN_ADDR_VAR, defaults.listen_addr)?,
            read_timeout: seconds_or(lookup(READ_TIMEOUT_VAR), READ_TIMEOUT_VAR, defaults.read_timeout)?,
            write_timeout: seconds_or(lookup(WRITE_TIMEOUT_VAR), WRITE_TIMEOUT_VAR, defaults.write_timeout)?,
            router_scheme: parse_or(lookup(ROUTER_SCHEME_VAR), ROUTER_SCHEME_VAR, defaults.router_scheme)?,
            router_timeout: seconds_or(lookup(ROUTER_TIMEOUT_VAR), ROUTER_TIMEOUT_VAR, defaults.router_timeout)?,
            router_accept_invalid_certs: parse_or(
                lookup(ROUTER_INSECURE_VAR),
                ROUTER_INSECURE_VAR,
                defaults.router_accept_invalid_certs,
            )?,
        })
    }

    /// Transport settings for router sessions
    pub fn dial_options(&self) -> DialOptions {
        DialOptions {
            scheme: self.router_scheme,
            timeout: self.router_timeout,
            accept_invalid_certs: self.router_accept_invalid_certs,
        }
    }
}

fn parse_or<T>(value: Option<String>, name: &str, default: T) -> Result<T, GatewayError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e| {
            GatewayError::InvalidConfig(format!("{} has invalid value {:?}: {}", name, raw, e))
        }),
    }
}

fn seconds_or(value: Option<String>, name: &str, default: Duration) -> Result<Duration, GatewayError> {
    let secs: u64 = parse_or(value, name, default.as_secs())?;
    if secs == 0 {
        return Err(GatewayError::InvalidConfig(format!("{} must be at least 1 second", name)));
    }
    Ok(Duration::from_secs(secs))
}
