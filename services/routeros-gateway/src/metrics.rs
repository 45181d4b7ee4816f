//! Prometheus metrics for the gateway.

use crate::error::GatewayError;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::fmt;
use std::time::Duration;

/// Request outcome label values
pub mod outcome {
    /// Request succeeded
    pub const OK: &str = "ok";
    /// Body was not the expected JSON object
    pub const INVALID_JSON: &str = "invalid_json";
    /// Dial failed
    pub const CONNECTION_FAILED: &str = "connection_failed";
    /// Router rejected the command
    pub const COMMAND_FAILED: &str = "command_failed";
    /// Request task panicked
    pub const INTERNAL: &str = "internal";
}

/// Counters and histograms exposed at `/metrics`
#[derive(Clone)]
pub struct GatewayMetrics {
    registry: Registry,
    requests: IntCounterVec,
    router_calls: HistogramVec,
}

impl fmt::Debug for GatewayMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayMetrics").finish_non_exhaustive()
    }
}

impl GatewayMetrics {
    /// Create and register all gateway metrics in a fresh registry
    pub fn new() -> Result<Self, GatewayError> {
        let registry = Registry::new();

        let requests = IntCounterVec::new(
            Opts::new("routeros_gateway_requests_total", "Gateway requests by endpoint and outcome"),
            &["endpoint", "outcome"],
        )?;
        let router_calls = HistogramVec::new(
            HistogramOpts::new(
                "routeros_gateway_router_call_duration_seconds",
                "Duration of calls to routers by operation",
            ),
            &["operation"],
        )?;

        registry.register(Box::new(requests.clone()))?;
        registry.register(Box::new(router_calls.clone()))?;

        Ok(Self {
            registry,
            requests,
            router_calls,
        })
    }

    /// Count one finished request
    pub fn record_request(&self, endpoint: &str, outcome: &str) {
        self.requests.with_label_values(&[endpoint, outcome]).inc();
    }

    /// Record how long a dial or run took
    pub fn observe_router_call(&self, operation: &str, elapsed: Duration) {
        self.router_calls
            .with_label_values(&[operation])
            .observe(elapsed.as_secs_f64());
    }

    /// Number of requests recorded for an endpoint and outcome
    pub fn request_count(&self, endpoint: &str, outcome: &str) -> u64 {
        self.requests.with_label_values(&[endpoint, outcome]).get()
    }

    /// Render all metrics in the Prometheus text format
    pub fn render(&self) -> Result<String, GatewayError> {
        Ok(TextEncoder::new().encode_to_string(&self.registry.gather())?)
    }
}
