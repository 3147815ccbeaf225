//! Default value functions for configuration.
//!
//! Separated into its own module for clarity and reuse.

// =============================================================================
// Robot Defaults
// =============================================================================

pub fn default_robot_name() -> String {
    "Flowbot".to_string()
}

// =============================================================================
// Endpoint Defaults
// =============================================================================

pub fn default_chat_url() -> String {
    "https://api.flowdock.com/v1/messages/chat".to_string()
}

pub fn default_inbox_url() -> String {
    "https://api.flowdock.com/v1/messages/team_inbox".to_string()
}

// =============================================================================
// Stream Defaults
// =============================================================================

pub fn default_max_line_len() -> usize {
    flowbot_proto::DEFAULT_MAX_LINE_LEN
}

pub fn default_connect_timeout() -> u64 {
    30
}

// =============================================================================
// Sender Defaults
// =============================================================================

pub fn default_send_timeout() -> u64 {
    10
}
