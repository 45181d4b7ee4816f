//! HTTP endpoint handlers

use axum::{
    body::Bytes,
    extract::State,
    http::header,
    response::{IntoResponse, Json},
};
use routeros_client::ReplyRow;
use std::sync::Arc;

use super::responses::{ConnectResponse, HealthResponse};
use crate::error::GatewayError;
use crate::metrics::outcome;
use crate::request::{decode, CommandRequest, ConnectionRequest};
use crate::service::GatewayService;

/// Handle POST /connect - Prove the router is reachable with the given credentials
pub async fn connect_handler(
    State(service): State<Arc<GatewayService>>,
    body: Bytes,
) -> Result<Json<ConnectResponse>, GatewayError> {
    detached(async move {
        let result = connect(&service, &body).await;
        service.metrics().record_request("connect", outcome_of(&result));
        result
    })
    .await
    .map(|()| Json(ConnectResponse::connected()))
}

/// Handle POST /command - Run one command and return its data records
pub async fn command_handler(
    State(service): State<Arc<GatewayService>>,
    body: Bytes,
) -> Result<Json<Vec<ReplyRow>>, GatewayError> {
    detached(async move {
        let result = command(&service, &body).await;
        service.metrics().record_request("command", outcome_of(&result));
        result
    })
    .await
    .map(Json)
}

/// Handle GET /healthz - Liveness probe
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// Handle GET /metrics - Prometheus scrape endpoint
pub async fn metrics_handler(
    State(service): State<Arc<GatewayService>>,
) -> Result<impl IntoResponse, GatewayError> {
    let text = service.metrics().render()?;
    Ok(([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], text))
}

/// Run `work` on its own task. Dropping the response future (write timeout,
/// client disconnect) must not cancel a session between dial and close.
async fn detached<T, F>(work: F) -> Result<T, GatewayError>
where
    T: Send + 'static,
    F: Future<Output = Result<T, GatewayError>> + Send + 'static,
{
    tokio::spawn(work)
        .await
        .map_err(|e| GatewayError::Internal(format!("request task failed: {}", e)))?
}

async fn connect(service: &GatewayService, body: &[u8]) -> Result<(), GatewayError> {
    let request: ConnectionRequest = decode(body)?;
    service.connect(&request).await
}

async fn command(service: &GatewayService, body: &[u8]) -> Result<Vec<ReplyRow>, GatewayError> {
    let request: CommandRequest = decode(body)?;
    service.command(&request).await
}

fn outcome_of<T>(result: &Result<T, GatewayError>) -> &'static str {
    match result {
        Ok(_) => outcome::OK,
        Err(GatewayError::InvalidJson(_)) => outcome::INVALID_JSON,
        Err(GatewayError::ConnectionFailed(_)) => outcome::CONNECTION_FAILED,
        Err(GatewayError::CommandFailed(_)) => outcome::COMMAND_FAILED,
        Err(_) => outcome::INTERNAL,
    }
}
