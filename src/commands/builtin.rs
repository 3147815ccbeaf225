//! Stock commands wired up by the `flowbot` binary.

use super::{CommandBinding, CommandHandler, CommandRegistry};
use crate::error::RegistryError;
use crate::sender::Sender;
use async_trait::async_trait;
use flowbot_proto::EventRecord;
use tracing::warn;

pub const PING_PATTERN: &str = r"^!ping\b";
pub const ECHO_PATTERN: &str = r"^!echo\s+(?P<text>.+)";

/// Replies `pong` in the thread of the triggering message.
pub struct PingCommand {
    sender: Sender,
}

impl PingCommand {
    pub fn new(sender: Sender) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl CommandHandler for PingCommand {
    async fn handle(&self, _binding: &CommandBinding, event: &EventRecord) {
        if let Err(e) = self.sender.send_chat("pong", event.thread_id()).await {
            warn!(error = %e, "ping reply failed");
        }
    }
}

/// Repeats the `text` capture of its pattern back into the flow.
pub struct EchoCommand {
    sender: Sender,
}

impl EchoCommand {
    pub fn new(sender: Sender) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl CommandHandler for EchoCommand {
    async fn handle(&self, binding: &CommandBinding, event: &EventRecord) {
        let Some(text) = binding
            .pattern()
            .captures(&event.content)
            .and_then(|caps| caps.name("text"))
        else {
            return;
        };

        if let Err(e) = self.sender.send_chat(text.as_str(), event.thread_id()).await {
            warn!(error = %e, "echo reply failed");
        }
    }
}

/// Register the stock commands, in order, on `registry`.
pub fn register_builtin(
    registry: &mut CommandRegistry,
    sender: &Sender,
) -> Result<(), RegistryError> {
    registry.register(PING_PATTERN, PingCommand::new(sender.clone()))?;
    registry.register(ECHO_PATTERN, EchoCommand::new(sender.clone()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_builtin_patterns() {
        let config = Config::new("http://localhost/stream", "tok", "u", "p");
        let sender = Sender::with_client(&config, reqwest::Client::new());
        let mut registry = CommandRegistry::new();
        register_builtin(&mut registry, &sender).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.find("!ping").map(|b| b.as_str()), Some(PING_PATTERN));
        assert!(registry.find("!pinged").is_none());
        assert_eq!(registry.find("!echo hi there").map(|b| b.as_str()), Some(ECHO_PATTERN));
        assert!(registry.find("!echo").is_none());
    }
}
