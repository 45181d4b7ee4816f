//! RouterOS Gateway
//!
//! Serves the gateway HTTP API until SIGINT or SIGTERM.

use anyhow::Context;
use routeros_client::RestDialer;
use routeros_gateway::{create_router, GatewayConfig, GatewayMetrics, GatewayService};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "routeros_gateway=info,routeros_client=info,tower_http=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    info!("Starting RouterOS Gateway");

    let config = GatewayConfig::from_env()?;

    info!("Configuration:");
    info!("  Listen address: {}", config.listen_addr);
    info!("  Read timeout: {:?}", config.read_timeout);
    info!("  Write timeout: {:?}", config.write_timeout);
    info!("  Router scheme: {}", config.router_scheme);
    info!("  Router timeout: {:?}", config.router_timeout);

    let dialer = Arc::new(RestDialer::new(config.dial_options()));
    let service = Arc::new(GatewayService::new(dialer, GatewayMetrics::new()?));
    let app = create_router(service, &config);

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;

    info!("Server running on http://{}", config.listen_addr);
    info!("Endpoints:");
    info!("  POST /connect - Check router reachability and credentials");
    info!("  POST /command - Run a command on a router");
    info!("  GET  /healthz - Health check");
    info!("  GET  /metrics - Prometheus metrics");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Wait for SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for SIGINT: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received SIGINT"),
        () = terminate => info!("Received SIGTERM"),
    }
}
