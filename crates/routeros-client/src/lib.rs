//! RouterOS Session Client
//!
//! Client for running commands on MikroTik RouterOS devices through the
//! RouterOS v7 REST interface.
//!
//! # Example
//!
//! ```no_run
//! use routeros_client::{DialOptions, RestDialer, RouterDialer, RouterSession};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let dialer = RestDialer::new(DialOptions::default());
//! let mut session = dialer.dial("192.168.88.1:80", "admin", "").await?;
//!
//! let reply = session
//!     .run_args(&["/interface/print".to_string(), "?type=ether".to_string()])
//!     .await?;
//! for sentence in &reply.sentences {
//!     println!("{} {:?}", sentence.tag, sentence.attributes);
//! }
//!
//! session.close().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Sessions**: dial once, run commands, close
//! - **API word form**: `=name=value` attributes and `?query` words
//! - **Tagged replies**: REST responses re-expressed as `!re` / `!done` sentences
//! - **Mocking**: `test-util` feature provides a recording mock dialer

pub mod client;
pub mod command;
pub mod error;
pub mod models;
#[path = "trait.rs"]
pub mod routeros_trait;
#[cfg(feature = "test-util")]
pub mod mock;

pub use client::{DialOptions, RestDialer, RouterOSClient, Scheme};
pub use command::Command;
pub use error::RouterOSError;
pub use models::*;
pub use routeros_trait::{RouterDialer, RouterSession};
#[cfg(feature = "test-util")]
pub use mock::{DialCall, MockRouterDialer, MockRouterSession, RunCall};
