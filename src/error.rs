//! Unified error handling for flowbot.
//!
//! This module provides the error hierarchy for command registration, the
//! streaming connection and outbound sends, with static codes for metric
//! labeling.

use flowbot_proto::ProtocolError;
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Registry Errors (command registration)
// ============================================================================

/// Errors that can occur while registering a command.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("invalid command pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

// ============================================================================
// Stream Errors (connection + read loop)
// ============================================================================

/// Errors that terminate a streaming run.
///
/// None of these abort the process; the caller decides whether to restart.
#[derive(Debug, Error)]
pub enum StreamError {
    /// The request could not be built or sent.
    #[error("failed to connect to stream: {0}")]
    Connect(#[source] reqwest::Error),

    /// No response headers arrived within the connect timeout.
    #[error("timed out connecting to stream after {0:?}")]
    Timeout(Duration),

    /// The service answered, but not with a stream (bad credentials, unknown flow).
    #[error("stream rejected with status {status}: {body}")]
    Rejected { status: StatusCode, body: String },

    /// Reading the next line failed.
    #[error("stream read failed: {0}")]
    Read(#[from] ProtocolError),

    /// The service closed the stream.
    #[error("stream ended")]
    Ended,
}

impl StreamError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Connect(_) => "connect",
            Self::Timeout(_) => "timeout",
            Self::Rejected { .. } => "rejected",
            Self::Read(_) => "read",
            Self::Ended => "ended",
        }
    }

    /// Whether the failure happened before any line was read.
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::Connect(_) | Self::Timeout(_) | Self::Rejected { .. }
        )
    }
}

// ============================================================================
// Send Errors (outbound messages)
// ============================================================================

/// Errors from posting a chat or inbox message.
#[derive(Debug, Error)]
pub enum SendError {
    /// The service answered with a non-success status.
    #[error("send failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// The request could not be sent or the response not read.
    #[error("send request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The payload could not be serialized.
    #[error("failed to encode payload: {0}")]
    Encode(#[from] ProtocolError),
}

impl SendError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Status { .. } => "status",
            Self::Transport(_) => "transport",
            Self::Encode(_) => "encode",
        }
    }

    /// HTTP status, for [`SendError::Status`].
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for outbound sends.
pub type SendResult = Result<(), SendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_error_codes() {
        assert_eq!(StreamError::Ended.error_code(), "ended");
        let rejected = StreamError::Rejected {
            status: StatusCode::UNAUTHORIZED,
            body: "nope".into(),
        };
        assert_eq!(rejected.error_code(), "rejected");
        assert!(rejected.is_connection_error());
        assert!(!StreamError::Ended.is_connection_error());
    }

    #[test]
    fn test_send_error_status() {
        let err = SendError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "boom".into(),
        };
        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(err.to_string(), "send failed with status 500 Internal Server Error: boom");
    }

    #[test]
    fn test_invalid_pattern_message() {
        let source = regex::Regex::new("(").unwrap_err();
        let err = RegistryError::InvalidPattern {
            pattern: "(".into(),
            source,
        };
        assert!(err.to_string().starts_with("invalid command pattern \"(\""));
    }
}
