//! # flowbot-proto
//!
//! Wire types for the Flowdock streaming and messages APIs.
//!
//! ## Features
//!
//! - [`EventRecord`] decoding from newline-delimited JSON stream lines
//! - [`ChatMessage`] and [`InboxMessage`] payloads for outbound posts
//! - Optional Tokio integration: a [`LineCodec`] that frames a response body
//!   into lines
//!
//! ## Quick Start
//!
//! ```rust
//! use flowbot_proto::EventRecord;
//!
//! let line = br#"{"event":"message","flow":"f-1","content":"deploy staging"}"#;
//! let event = EventRecord::from_line(line).expect("valid event");
//! assert_eq!(event.content, "deploy staging");
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod error;
pub mod event;
#[cfg(feature = "tokio")]
pub mod line;
pub mod message;

pub use self::error::{ProtocolError, Result};
pub use self::event::{is_keepalive, EventRecord, MESSAGE_EVENT};
#[cfg(feature = "tokio")]
pub use self::line::{LineCodec, DEFAULT_MAX_LINE_LEN};
pub use self::message::{ChatMessage, InboxMessage};
