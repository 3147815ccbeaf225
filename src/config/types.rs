//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use super::defaults::*;
use super::secret::SecretString;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Robot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Robot identity.
    #[serde(default)]
    pub robot: RobotConfig,
    /// Flowdock endpoints and flow token.
    pub flowdock: FlowdockConfig,
    /// Basic-auth credentials for the streaming API.
    pub auth: AuthConfig,
    /// Streaming connection tuning.
    #[serde(default)]
    pub stream: StreamSettings,
    /// Outbound message tuning.
    #[serde(default)]
    pub sender: SenderConfig,
    /// Prometheus endpoint configuration.
    #[serde(default)]
    pub metrics: MetricsConfig,
    /// Log output configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Build a configuration in code, with defaults for everything optional.
    pub fn new(
        stream_url: impl Into<String>,
        flow_token: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            robot: RobotConfig::default(),
            flowdock: FlowdockConfig {
                stream_url: stream_url.into(),
                chat_url: default_chat_url(),
                inbox_url: default_inbox_url(),
                flow_token: SecretString::new(flow_token),
            },
            auth: AuthConfig {
                username: username.into(),
                password: SecretString::new(password),
            },
            stream: StreamSettings::default(),
            sender: SenderConfig::default(),
            metrics: MetricsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Settings for one streaming session.
    pub fn stream_config(&self) -> StreamConfig {
        StreamConfig {
            url: self.flowdock.stream_url.clone(),
            username: self.auth.username.clone(),
            password: self.auth.password.clone(),
            max_line_len: self.stream.max_line_len,
            connect_timeout: Duration::from_secs(self.stream.connect_timeout_secs),
        }
    }
}

/// Robot identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RobotConfig {
    /// Display name used as `external_user_name` on chat posts.
    #[serde(default = "default_robot_name")]
    pub name: String,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            name: default_robot_name(),
        }
    }
}

/// Flowdock endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FlowdockConfig {
    /// Streaming API URL for the flow(s) to follow.
    pub stream_url: String,
    /// Chat messages endpoint; the flow token is appended as a path segment.
    #[serde(default = "default_chat_url")]
    pub chat_url: String,
    /// Team inbox endpoint; the flow token is appended as a path segment.
    #[serde(default = "default_inbox_url")]
    pub inbox_url: String,
    /// Per-flow API token authorizing outbound posts.
    pub flow_token: SecretString,
}

/// Basic-auth credentials for the streaming connection.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub username: String,
    pub password: SecretString,
}

/// `[stream]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamSettings {
    /// Longest accepted stream line in bytes (default: 1 MiB).
    #[serde(default = "default_max_line_len")]
    pub max_line_len: usize,
    /// Seconds allowed to establish the connection and receive headers (default: 30).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            max_line_len: default_max_line_len(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

/// `[sender]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct SenderConfig {
    /// Per-request timeout for outbound posts in seconds (default: 10).
    #[serde(default = "default_send_timeout")]
    pub timeout_secs: u64,
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_send_timeout(),
        }
    }
}

/// Prometheus metrics configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricsConfig {
    /// HTTP port for `/metrics`. Absent or 0 disables the endpoint.
    pub port: Option<u16>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

/// Everything one dispatcher run needs to open the stream.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    pub url: String,
    pub username: String,
    pub password: SecretString,
    pub max_line_len: usize,
    pub connect_timeout: Duration,
}

impl StreamConfig {
    /// Stream settings with default limits.
    pub fn new(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            username: username.into(),
            password: SecretString::new(password),
            max_line_len: default_max_line_len(),
            connect_timeout: Duration::from_secs(default_connect_timeout()),
        }
    }
}
