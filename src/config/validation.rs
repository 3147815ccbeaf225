//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use reqwest::Url;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("flowdock.stream_url is required")]
    MissingStreamUrl,
    #[error("flowdock.flow_token is required")]
    MissingFlowToken,
    #[error("auth.username is required")]
    MissingUsername,
    #[error("{field} is not a valid http(s) URL: '{value}'")]
    InvalidUrl { field: &'static str, value: String },
    #[error("robot.name must not be empty")]
    EmptyRobotName,
    #[error("stream.max_line_len must be greater than 0")]
    ZeroMaxLineLen,
}

fn check_url(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    let valid = Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false);
    if !valid {
        errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        });
    }
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    // Required fields
    if config.flowdock.stream_url.is_empty() {
        errors.push(ValidationError::MissingStreamUrl);
    } else {
        check_url("flowdock.stream_url", &config.flowdock.stream_url, &mut errors);
    }
    if config.flowdock.flow_token.is_empty() {
        errors.push(ValidationError::MissingFlowToken);
    }
    if config.auth.username.is_empty() {
        errors.push(ValidationError::MissingUsername);
    }
    if config.robot.name.trim().is_empty() {
        errors.push(ValidationError::EmptyRobotName);
    }

    check_url("flowdock.chat_url", &config.flowdock.chat_url, &mut errors);
    check_url("flowdock.inbox_url", &config.flowdock.inbox_url, &mut errors);

    if config.stream.max_line_len == 0 {
        errors.push(ValidationError::ZeroMaxLineLen);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
