//! Error types for the Flowdock wire layer.
//!
//! This module defines errors for line framing on the streaming API and for
//! decoding/encoding the JSON payloads carried on it.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Top-level protocol errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error while reading the underlying byte stream.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Line exceeded maximum allowed length.
    #[error("line too long: {actual} bytes (limit: {limit})")]
    LineTooLong {
        /// Actual line length (so far, for partial lines).
        actual: usize,
        /// Maximum allowed length.
        limit: usize,
    },

    /// A line was not a valid event record (including invalid UTF-8).
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// An outbound payload could not be serialized.
    #[error("encode error: {0}")]
    Encode(#[source] serde_json::Error),
}

impl ProtocolError {
    /// Whether the stream can keep being read after this error.
    ///
    /// Decode failures only affect a single line; everything else means the
    /// framing is lost or the connection is broken.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}
