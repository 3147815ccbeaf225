//! Command registry: ordered (pattern, handler) bindings.

use super::handler::{CommandHandler, FnHandler};
use crate::error::RegistryError;
use flowbot_proto::EventRecord;
use regex::Regex;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// One registered rule.
#[derive(Clone)]
pub struct CommandBinding {
    pattern: Regex,
    handler: Arc<dyn CommandHandler>,
}

impl CommandBinding {
    /// The compiled pattern, for extracting captures inside a handler.
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// The pattern source text.
    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }

    /// Whether the pattern is found anywhere in `content`.
    #[inline]
    pub fn matches(&self, content: &str) -> bool {
        self.pattern.is_match(content)
    }

    pub(crate) fn handler(&self) -> &dyn CommandHandler {
        self.handler.as_ref()
    }
}

impl fmt::Debug for CommandBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandBinding")
            .field("pattern", &self.pattern.as_str())
            .finish_non_exhaustive()
    }
}

/// Registry of command bindings.
///
/// Append-only: there is no way to remove or replace a binding. Duplicate
/// patterns are accepted; a later duplicate is simply never reached.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    bindings: Vec<CommandBinding>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile `pattern` and append a binding for `handler`.
    ///
    /// On an invalid pattern the registry is left unchanged.
    pub fn register<H>(&mut self, pattern: &str, handler: H) -> Result<(), RegistryError>
    where
        H: CommandHandler + 'static,
    {
        let compiled = Regex::new(pattern).map_err(|source| RegistryError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;

        debug!(pattern = %pattern, position = self.bindings.len(), "Command registered");
        self.bindings.push(CommandBinding {
            pattern: compiled,
            handler: Arc::new(handler),
        });
        Ok(())
    }

    /// Register a synchronous closure as a handler.
    pub fn register_fn<F>(&mut self, pattern: &str, handler: F) -> Result<(), RegistryError>
    where
        F: Fn(&CommandBinding, &EventRecord) + Send + Sync + 'static,
    {
        self.register(pattern, FnHandler(handler))
    }

    /// All bindings in registration order.
    pub fn bindings(&self) -> &[CommandBinding] {
        &self.bindings
    }

    /// First binding whose pattern is found in `content`.
    pub fn find(&self, content: &str) -> Option<&CommandBinding> {
        self.bindings.iter().find(|b| b.matches(content))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
