//! RouterOS Gateway
//!
//! HTTP gateway that forwards JSON requests to MikroTik routers and returns the
//! router's reply as JSON.
//!
//! Endpoints:
//! - `POST /connect` - dial a router and report whether it accepted the credentials
//! - `POST /command` - run one command and return its data records
//! - `GET /healthz` - liveness probe
//! - `GET /metrics` - Prometheus metrics
//!
//! Router sessions are opened per request through an injected
//! [`routeros_client::RouterDialer`] and closed before the response is sent.

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod reply;
pub mod request;
pub mod service;

pub use api::create_router;
pub use config::GatewayConfig;
pub use error::GatewayError;
pub use metrics::GatewayMetrics;
pub use request::{CommandRequest, ConnectionRequest};
pub use service::GatewayService;
