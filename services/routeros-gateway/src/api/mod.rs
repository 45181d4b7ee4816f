//! HTTP API module
//!
//! Routes, handlers, and response bodies for the gateway.

pub mod handlers;
pub mod responses;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::timeout::{RequestBodyTimeoutLayer, TimeoutLayer};
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::service::GatewayService;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(service: Arc<GatewayService>, config: &GatewayConfig) -> Router {
    Router::new()
        .route("/connect", post(connect_handler))
        .route("/command", post(command_handler))
        .route("/healthz", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(config.write_timeout))
                .layer(RequestBodyTimeoutLayer::new(config.read_timeout)),
        )
        .with_state(service)
}
