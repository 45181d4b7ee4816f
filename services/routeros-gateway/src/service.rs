//! Gateway service.
//!
//! Holds the injected router dialer and carries out the two gateway operations:
//! proving a router is reachable, and running one command on it. Every session
//! opened here is closed before the operation returns.

use crate::error::GatewayError;
use crate::metrics::GatewayMetrics;
use crate::reply::data_rows;
use crate::request::{CommandRequest, ConnectionRequest};
use routeros_client::{ReplyRow, RouterDialer, RouterSession};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Gateway operations over an injected router dialer
#[derive(Clone)]
pub struct GatewayService {
    dialer: Arc<dyn RouterDialer>,
    metrics: GatewayMetrics,
}

impl fmt::Debug for GatewayService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayService")
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}

impl GatewayService {
    /// Create a service using `dialer` to open router sessions
    pub fn new(dialer: Arc<dyn RouterDialer>, metrics: GatewayMetrics) -> Self {
        Self { dialer, metrics }
    }

    /// Metrics recorded by this service
    pub fn metrics(&self) -> &GatewayMetrics {
        &self.metrics
    }

    /// Dial the router and close the session straight away.
    pub async fn connect(&self, request: &ConnectionRequest) -> Result<(), GatewayError> {
        let mut session = self.open(request).await?;
        self.close(session.as_mut()).await;
        info!(address = %request.address(), "Router reachable");
        Ok(())
    }

    /// Run one command and return the reply's data records.
    ///
    /// A non-empty payload is sent as `=key=value` arguments after the command;
    /// otherwise the command is run on its own.
    pub async fn command(&self, request: &CommandRequest) -> Result<Vec<ReplyRow>, GatewayError> {
        let mut session = self.open(&request.connection).await?;

        let started = Instant::now();
        let outcome = match request.arguments() {
            Some(words) => session.run_args(&words).await,
            None => session.run(&request.command).await,
        };
        self.metrics.observe_router_call("run", started.elapsed());

        self.close(session.as_mut()).await;

        match outcome {
            Ok(reply) => {
                let rows = data_rows(reply);
                info!(
                    address = %request.connection.address(),
                    command = %request.command,
                    rows = rows.len(),
                    "Command succeeded"
                );
                Ok(rows)
            }
            Err(e) => {
                error!(
                    address = %request.connection.address(),
                    command = %request.command,
                    payload = %request.payload_json(),
                    error = %e,
                    "Command failed"
                );
                Err(GatewayError::CommandFailed(e))
            }
        }
    }

    async fn open(&self, request: &ConnectionRequest) -> Result<Box<dyn RouterSession>, GatewayError> {
        let address = request.address();
        debug!(address = %address, user = %request.user, "Dialing router");

        let started = Instant::now();
        let result = self
            .dialer
            .dial(&address, &request.user, &request.password)
            .await;
        self.metrics.observe_router_call("dial", started.elapsed());

        result.map_err(|e| {
            warn!(address = %address, user = %request.user, error = %e, "Router connection failed");
            GatewayError::ConnectionFailed(e)
        })
    }

    async fn close(&self, session: &mut dyn RouterSession) {
        if let Err(e) = session.close().await {
            warn!(address = %session.address(), error = %e, "Failed to close router session");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use routeros_client::{MockRouterDialer, Reply, RunCall, Sentence};
    use std::collections::HashMap;

    fn service(dialer: &MockRouterDialer) -> GatewayService {
        GatewayService::new(Arc::new(dialer.clone()), GatewayMetrics::new().unwrap())
    }

    fn connection() -> ConnectionRequest {
        ConnectionRequest {
            host: "192.168.88.1".to_string(),
            port: "80".to_string(),
            user: "admin".to_string(),
            password: "pw".to_string(),
        }
    }

    fn command(command: &str, payload: Option<HashMap<String, String>>) -> CommandRequest {
        CommandRequest {
            connection: connection(),
            command: command.to_string(),
            payload,
        }
    }

    #[tokio::test]
    async fn test_connect_dials_and_closes() {
        let dialer = MockRouterDialer::new();

        service(&dialer).connect(&connection()).await.unwrap();

        let dials = dialer.dial_calls();
        assert_eq!(dials.len(), 1);
        assert_eq!(dials[0].address, "192.168.88.1:80");
        assert_eq!(dials[0].username, "admin");
        assert_eq!(dials[0].password, "pw");
        assert!(dialer.run_calls().is_empty());
        assert_eq!(dialer.close_count(), 1);
    }

    #[tokio::test]
    async fn test_connect_failure_creates_no_session() {
        let dialer = MockRouterDialer::new();
        dialer.fail_dial("no route to host");

        let err = service(&dialer).connect(&connection()).await.unwrap_err();

        assert!(matches!(err, GatewayError::ConnectionFailed(_)));
        assert_eq!(dialer.close_count(), 0);
    }

    #[tokio::test]
    async fn test_command_without_payload_uses_plain_run() {
        let dialer = MockRouterDialer::new();

        service(&dialer)
            .command(&command("/interface/print", None))
            .await
            .unwrap();

        assert_eq!(
            dialer.run_calls(),
            vec![RunCall::Plain("/interface/print".to_string())]
        );
        assert_eq!(dialer.close_count(), 1);
    }

    #[tokio::test]
    async fn test_command_failure_still_closes() {
        let dialer = MockRouterDialer::new();
        dialer.fail_run("no such command");

        let err = service(&dialer)
            .command(&command("/bogus", Some(HashMap::from([("a".to_string(), "1".to_string())]))))
            .await
            .unwrap_err();

        assert!(matches!(err, GatewayError::CommandFailed(_)));
        assert_eq!(dialer.close_count(), 1);
    }

    #[test]
    fn test_debug_names_service() {
        let text = format!("{:?}", service(&MockRouterDialer::new()));
        assert!(text.starts_with("GatewayService"));
        assert!(text.contains("GatewayMetrics"));
    }

    #[tokio::test]
    async fn test_command_returns_only_data_rows() {
        let dialer = MockRouterDialer::new();
        let row = ReplyRow::from([("name".to_string(), "ether1".to_string())]);
        dialer.set_reply(Reply::new(vec![Sentence::record(row.clone()), Sentence::done(None)]));

        let rows = service(&dialer)
            .command(&command("/interface/print", None))
            .await
            .unwrap();

        assert_eq!(rows, vec![row]);
    }
}
