//! Outbound chat and team inbox messages.
//!
//! Both operations are one-shot POSTs of a JSON body to
//! `<endpoint>/<flow-token>`. A [`Sender`] holds only read-only configuration
//! and a shared HTTP client, so clones can be used from any number of
//! handlers concurrently with the dispatch loop.

use crate::config::{Config, SecretString};
use crate::error::{SendError, SendResult};
use flowbot_proto::{ChatMessage, InboxMessage};
use reqwest::header::CONTENT_TYPE;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug)]
struct Endpoints {
    chat_url: String,
    inbox_url: String,
    flow_token: SecretString,
}

fn join_token(base: &str, token: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), token)
}

/// Posts messages into the configured flow.
#[derive(Debug, Clone)]
pub struct Sender {
    client: reqwest::Client,
    robot_name: Arc<str>,
    endpoints: Arc<Endpoints>,
}

impl Sender {
    /// Build a sender from configuration.
    pub fn new(config: &Config) -> Result<Self, SendError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.sender.timeout_secs))
            .user_agent(concat!("flowbot/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(config, client))
    }

    /// Build a sender that shares an existing HTTP client.
    pub fn with_client(config: &Config, client: reqwest::Client) -> Self {
        Self {
            client,
            robot_name: Arc::from(config.robot.name.as_str()),
            endpoints: Arc::new(Endpoints {
                chat_url: config.flowdock.chat_url.clone(),
                inbox_url: config.flowdock.inbox_url.clone(),
                flow_token: config.flowdock.flow_token.clone(),
            }),
        }
    }

    /// Display name used as the chat author.
    pub fn robot_name(&self) -> &str {
        &self.robot_name
    }

    /// Post a chat message, optionally as a reply in `thread_id`.
    pub async fn send_chat(&self, content: &str, thread_id: Option<&str>) -> SendResult {
        let mut message = ChatMessage::new(content, self.robot_name.as_ref());
        if let Some(thread_id) = thread_id {
            message = message.in_thread(thread_id);
        }
        self.send_chat_message(&message).await
    }

    /// Post a chat message as a reply in `thread_id`.
    pub async fn send_thread_chat(&self, thread_id: &str, content: &str) -> SendResult {
        self.send_chat(content, Some(thread_id)).await
    }

    /// Post a prepared chat payload.
    pub async fn send_chat_message(&self, message: &ChatMessage) -> SendResult {
        let body = message.to_json()?;
        self.post("chat", &self.endpoints.chat_url, body).await
    }

    /// Post an item to the team inbox.
    pub async fn send_inbox(&self, message: &InboxMessage) -> SendResult {
        let body = message.to_json()?;
        self.post("inbox", &self.endpoints.inbox_url, body).await
    }

    async fn post(&self, kind: &'static str, base: &str, body: Vec<u8>) -> SendResult {
        let url = join_token(base, self.endpoints.flow_token.expose());
        let result = self.post_inner(&url, body).await;

        match &result {
            Ok(()) => {
                crate::metrics::record_sent(kind);
                info!(kind, "Message sent");
            }
            Err(e) => {
                crate::metrics::record_send_error(kind, e.error_code());
                warn!(kind, error = %e, "Failed to send message");
            }
        }
        result
    }

    async fn post_inner(&self, url: &str, body: Vec<u8>) -> SendResult {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(SendError::Status { status, body })
    }
}
