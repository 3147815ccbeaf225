//! Outbound message payloads for the messages API.

use serde::Serialize;

use crate::error::{ProtocolError, Result};

/// A chat message posted into a flow on behalf of an external user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    /// Message body.
    pub content: String,
    /// Display name shown as the author.
    pub external_user_name: String,
    /// Thread to reply into, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
}

impl ChatMessage {
    /// Create a top-level chat message.
    pub fn new(content: impl Into<String>, external_user_name: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            external_user_name: external_user_name.into(),
            thread_id: None,
        }
    }

    /// Reply into the given thread.
    #[must_use]
    pub fn in_thread(mut self, thread_id: impl Into<String>) -> Self {
        self.thread_id = Some(thread_id.into());
        self
    }

    /// Serialize to the JSON request body.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(ProtocolError::Encode)
    }
}

/// A team inbox item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InboxMessage {
    /// Human readable name of the sending application.
    pub source: String,
    /// Email address of the sender.
    pub from_address: String,
    /// Subject line.
    pub subject: String,
    /// Message body (HTML allowed by the service).
    pub content: String,
}

impl InboxMessage {
    /// Build an inbox item from its four parts.
    pub fn new(
        source: impl Into<String>,
        from_address: impl Into<String>,
        subject: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            from_address: from_address.into(),
            subject: subject.into(),
            content: content.into(),
        }
    }

    /// Serialize to the JSON request body.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(ProtocolError::Encode)
    }
}
