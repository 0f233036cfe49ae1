//! Change poller for mmd live preview pages.
//!
//! A preview page asks the server every [`POLL_INTERVAL`] whether its source
//! was recompiled, and reloads when the answer is yes:
//!
//! ```text
//! GET {server_address}/is_changed/  ->  200 {"is_changed": true|false}
//! ```
//!
//! There are two outcomes per tick. Status 200 is success: a true flag
//! reloads the page (which ends polling), a false or missing flag does
//! nothing. Anything else, including a request that never got a response,
//! raises an alert and polling carries on at the next tick. There is no
//! retry, backoff or de-duplication.
//!
//! The served page runs a JavaScript rendition of this loop; this crate is
//! the same contract for Rust hosts such as `mmd follow`.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use mmd_poller::{ChangePoller, HttpChangeSource, PageHost};
//!
//! struct Terminal;
//!
//! impl PageHost for Terminal {
//!     fn reload(&self) { /* fetch the page again */ }
//!     fn alert(&self, message: &str) { eprintln!("{message}"); }
//! }
//!
//! let source = Arc::new(HttpChangeSource::new("http://localhost:8000"));
//! let handle = ChangePoller::new(source, Arc::new(Terminal)).spawn();
//! let exit = handle.wait().await;
//! ```

mod error;
mod host;
mod poller;
mod source;

pub use error::PollError;
pub use host::PageHost;
pub use poller::{ChangePoller, POLL_INTERVAL, PollerExit, PollerHandle, TickOutcome};
pub use source::{ChangeSource, HttpChangeSource};

/// Path of the change endpoint, relative to the server address.
pub const CHANGE_PATH: &str = "/is_changed/";
