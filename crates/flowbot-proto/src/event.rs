//! Streamed event records.
//!
//! Each line of the streaming API is one JSON object describing activity in a
//! flow: a chat message, a comment, a status change and so on. Only
//! [`EventRecord::content`] is interpreted by this library; every other field
//! is carried through to command handlers untouched.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ProtocolError, Result};

/// Event kind used for plain chat messages.
pub const MESSAGE_EVENT: &str = "message";

/// One unit of streamed flow activity.
///
/// Fields missing from the wire, or sent as `null`, decode to their zero
/// value, matching how the service omits empty attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventRecord {
    /// Event kind (`message`, `comment`, `activity.user`, ...).
    #[serde(deserialize_with = "null_as_default")]
    pub event: String,
    /// Tags attached to the event.
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    /// Client-generated unique identifier.
    #[serde(deserialize_with = "null_as_default")]
    pub uuid: String,
    /// Whether the service persisted this event.
    #[serde(deserialize_with = "null_as_default")]
    pub persist: bool,
    /// Server-assigned numeric id.
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    /// Id of the flow the event belongs to.
    #[serde(deserialize_with = "null_as_default")]
    pub flow: String,
    /// Textual content. The only field used for command matching.
    #[serde(deserialize_with = "null_as_default")]
    pub content: String,
    /// Sent time in milliseconds since the Unix epoch.
    #[serde(deserialize_with = "null_as_default")]
    pub sent: i64,
    /// Originating application.
    #[serde(deserialize_with = "null_as_default")]
    pub app: String,
    /// Server creation time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Attachment references.
    #[serde(deserialize_with = "null_as_default")]
    pub attachments: Vec<String>,
    /// Author user id.
    #[serde(deserialize_with = "null_as_default")]
    pub user: String,
    /// Thread the event belongs to, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl EventRecord {
    /// Decode one stream line into an event record.
    ///
    /// The line must be a JSON object; leading/trailing whitespace is allowed.
    pub fn from_line(line: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(line)?)
    }

    /// Encode this record as a single wire line (without terminator).
    pub fn to_line(&self) -> Result<String> {
        serde_json::to_string(self).map_err(ProtocolError::Encode)
    }

    /// Whether this is a plain chat message.
    pub fn is_message(&self) -> bool {
        self.event == MESSAGE_EVENT
    }

    /// The `sent` timestamp as a UTC date-time.
    ///
    /// Returns `None` when `sent` is zero or out of range.
    pub fn sent_at(&self) -> Option<DateTime<Utc>> {
        if self.sent == 0 {
            return None;
        }
        Utc.timestamp_millis_opt(self.sent).single()
    }

    /// Thread id as a borrowed string.
    pub fn thread_id(&self) -> Option<&str> {
        self.thread_id.as_deref()
    }
}

/// Whether a line is a keep-alive (empty or whitespace only).
///
/// The stream emits bare newlines periodically to hold the connection open.
pub fn is_keepalive(line: &[u8]) -> bool {
    line.iter().all(u8::is_ascii_whitespace)
}
