//! Mock router dialer for unit testing
//!
//! Records every dial, command, and close so tests can assert on how a caller
//! used its sessions, without a router on the network.

use crate::error::RouterOSError;
use crate::models::Reply;
use crate::routeros_trait::{RouterDialer, RouterSession};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// A dial attempt seen by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialCall {
    /// Address passed to `dial`
    pub address: String,
    /// User passed to `dial`
    pub username: String,
    /// Password passed to `dial`
    pub password: String,
}

/// A command seen by a mock session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunCall {
    /// `run(command)`
    Plain(String),
    /// `run_args(words)`
    Args(Vec<String>),
}

#[derive(Debug, Default)]
struct MockState {
    dial_error: Option<String>,
    run_error: Option<String>,
    run_delay: Option<Duration>,
    reply: Reply,
    dial_calls: Vec<DialCall>,
    run_calls: Vec<RunCall>,
    close_count: usize,
}

/// Mock dialer
///
/// Clones share state, so a test can keep one handle and give another to the
/// code under test.
#[derive(Debug, Clone, Default)]
pub struct MockRouterDialer {
    state: Arc<Mutex<MockState>>,
}

impl MockRouterDialer {
    /// Create a mock whose dials succeed and whose commands return an empty reply
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every dial fail with an API error carrying `message`
    pub fn fail_dial(&self, message: impl Into<String>) {
        self.state().dial_error = Some(message.into());
    }

    /// Make every command fail with a trap carrying `message`
    pub fn fail_run(&self, message: impl Into<String>) {
        self.state().run_error = Some(message.into());
    }

    /// Make every command take `delay` before it answers
    pub fn delay_run(&self, delay: Duration) {
        self.state().run_delay = Some(delay);
    }

    /// Reply returned by every successful command
    pub fn set_reply(&self, reply: Reply) {
        self.state().reply = reply;
    }

    /// Dial attempts in order
    pub fn dial_calls(&self) -> Vec<DialCall> {
        self.state().dial_calls.clone()
    }

    /// Commands run on any session, in order
    pub fn run_calls(&self) -> Vec<RunCall> {
        self.state().run_calls.clone()
    }

    /// Number of `close` calls across all sessions
    pub fn close_count(&self) -> usize {
        self.state().close_count
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait::async_trait]
impl RouterDialer for MockRouterDialer {
    async fn dial(
        &self,
        address: &str,
        username: &str,
        password: &str,
    ) -> Result<Box<dyn RouterSession>, RouterOSError> {
        let mut state = self.state();
        state.dial_calls.push(DialCall {
            address: address.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        });
        if let Some(message) = &state.dial_error {
            return Err(RouterOSError::Api(message.clone()));
        }

        Ok(Box::new(MockRouterSession {
            address: address.to_string(),
            state: Arc::clone(&self.state),
        }))
    }
}

/// Session handed out by [`MockRouterDialer`]
#[derive(Debug)]
pub struct MockRouterSession {
    address: String,
    state: Arc<Mutex<MockState>>,
}

impl MockRouterSession {
    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn record(&self, call: RunCall) -> Result<Reply, RouterOSError> {
        let delay = self.state().run_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state();
        state.run_calls.push(call);
        match &state.run_error {
            Some(message) => Err(RouterOSError::Trap {
                message: message.clone(),
            }),
            None => Ok(state.reply.clone()),
        }
    }
}

#[async_trait::async_trait]
impl RouterSession for MockRouterSession {
    fn address(&self) -> &str {
        &self.address
    }

    async fn run(&mut self, command: &str) -> Result<Reply, RouterOSError> {
        self.record(RunCall::Plain(command.to_string())).await
    }

    async fn run_args(&mut self, words: &[String]) -> Result<Reply, RouterOSError> {
        self.record(RunCall::Args(words.to_vec())).await
    }

    async fn close(&mut self) -> Result<(), RouterOSError> {
        self.state().close_count += 1;
        Ok(())
    }
}
