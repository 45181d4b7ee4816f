//! Router session traits for mocking
//!
//! These traits abstract dialing a router and running commands on the resulting
//! session. The REST client implements them, and tests can substitute mock
//! implementations.

use crate::error::RouterOSError;
use crate::models::Reply;

/// Opens authenticated sessions to routers.
///
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait RouterDialer: Send + Sync {
    /// Connect to `address` (`host:port`) and authenticate.
    async fn dial(
        &self,
        address: &str,
        username: &str,
        password: &str,
    ) -> Result<Box<dyn RouterSession>, RouterOSError>;
}

/// A live session with one router.
///
/// Sessions are single-use and must be closed by their owner.
#[async_trait::async_trait]
pub trait RouterSession: Send {
    /// Address the session was dialed with
    fn address(&self) -> &str;

    /// Run a command with no arguments
    async fn run(&mut self, command: &str) -> Result<Reply, RouterOSError>;

    /// Run a command given as API words: the command followed by `=key=value`
    /// and `?query` words
    async fn run_args(&mut self, words: &[String]) -> Result<Reply, RouterOSError>;

    /// Close the session
    async fn close(&mut self) -> Result<(), RouterOSError>;
}
