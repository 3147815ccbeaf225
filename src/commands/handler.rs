use super::CommandBinding;
use async_trait::async_trait;
use flowbot_proto::EventRecord;

/// Reacts to an event whose content matched a binding's pattern.
///
/// The dispatcher awaits `handle` before reading the next line, so a
/// handler holding the loop holds the whole stream. Handlers report their own
/// failures (for example a [`crate::SendError`] from a reply); nothing is
/// returned to the dispatcher.
///
/// ## Example
///
/// ```ignore
/// struct Ping { sender: Sender }
///
/// #[async_trait]
/// impl CommandHandler for Ping {
///     async fn handle(&self, _binding: &CommandBinding, event: &EventRecord) {
///         if let Err(e) = self.sender.send_chat("pong", event.thread_id()).await {
///             tracing::warn!(error = %e, "ping reply failed");
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(&self, binding: &CommandBinding, event: &EventRecord);
}

/// Adapter for synchronous closures, see [`super::CommandRegistry::register_fn`].
pub struct FnHandler<F>(pub F);

#[async_trait]
impl<F> CommandHandler for FnHandler<F>
where
    F: Fn(&CommandBinding, &EventRecord) + Send + Sync,
{
    async fn handle(&self, binding: &CommandBinding, event: &EventRecord) {
        (self.0)(binding, event)
    }
}
