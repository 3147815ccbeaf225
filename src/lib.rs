//! flowbot - a Flowdock robot library.
//!
//! Follow a flow's streaming API, match each message against registered
//! command patterns and reply through the messages API.
//!
//! ```no_run
//! use flowbot::{CommandBinding, CommandRegistry, Config, EventRecord, StreamDispatcher};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let config = Config::load("flowbot.toml")?;
//!
//! let mut registry = CommandRegistry::new();
//! registry.register_fn("^deploy ", |_: &CommandBinding, event: &EventRecord| {
//!     println!("deploy requested: {}", event.content);
//! })?;
//!
//! let dispatcher = StreamDispatcher::new(config.stream_config(), registry);
//! dispatcher.run_until(async { tokio::signal::ctrl_c().await.ok(); }).await?;
//! # Ok(())
//! # }
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod http;
pub mod metrics;
pub mod sender;
pub mod stream;
pub mod telemetry;

pub use commands::{CommandBinding, CommandHandler, CommandRegistry};
pub use config::{Config, ConfigError, StreamConfig};
pub use error::{RegistryError, SendError, SendResult, StreamError};
pub use flowbot_proto::{ChatMessage, EventRecord, InboxMessage};
pub use sender::Sender;
pub use stream::{DispatchStats, DispatcherState, LineOutcome, StreamDispatcher};
