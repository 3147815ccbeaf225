//! Streaming ingestion and command dispatch.
//!
//! A [`StreamDispatcher`] opens one authenticated connection to the streaming
//! API, frames the response body into lines, decodes each line into an
//! [`flowbot_proto::EventRecord`] and hands it to the first matching command.
//!
//! ## Lifecycle
//!
//! ```text
//! Disconnected -> Connecting -> Streaming -> Failed
//!                                        \-> Stopped (shutdown requested)
//! ```
//!
//! There is no reconnect state: every run ends by returning to the caller,
//! which owns the retry policy.

mod dispatcher;
mod session;
mod state;

pub use dispatcher::{DispatchStats, LineOutcome, StreamDispatcher};
pub use state::DispatcherState;
