//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Config struct definitions (Config, RobotConfig, FlowdockConfig, ...)
//! - [`secret`]: Zeroize-on-drop wrapper for passwords and tokens
//! - [`defaults`]: Serde default value functions
//! - [`validation`]: Startup validation collecting every problem at once

mod defaults;
mod secret;
mod types;
mod validation;

pub use secret::SecretString;
pub use types::{
    AuthConfig, Config, ConfigError, FlowdockConfig, LogFormat, LoggingConfig, MetricsConfig,
    RobotConfig, SenderConfig, StreamConfig, StreamSettings,
};
pub use validation::{ValidationError, validate};
