//! The read → decode → dispatch loop.

use super::session::StreamSession;
use super::state::DispatcherState;
use crate::commands::CommandRegistry;
use crate::config::StreamConfig;
use crate::error::StreamError;
use crate::telemetry::{CommandTimer, spans};
use flowbot_proto::{EventRecord, ProtocolError, is_keepalive};
use parking_lot::RwLock;
use std::future::Future;
use tracing::{Instrument, debug, info, trace, warn};

/// Longest slice of a malformed line included in the diagnostic.
const MALFORMED_PREVIEW_LEN: usize = 200;

/// What happened to one line read from the stream.
#[derive(Debug)]
pub enum LineOutcome {
    /// Whitespace-only heartbeat; ignored.
    Keepalive,
    /// The line was not a valid event record and was skipped.
    Malformed(ProtocolError),
    /// Decoded, but no command pattern matched the content.
    Unmatched,
    /// The handler bound to `pattern` ran.
    Dispatched { pattern: String },
}

/// Counters for one streaming run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Every line read, keep-alives included.
    pub lines: u64,
    pub keepalives: u64,
    /// Lines that decoded into an event record.
    pub events: u64,
    pub decode_failures: u64,
    pub dispatched: u64,
    pub unmatched: u64,
}

impl DispatchStats {
    fn record(&mut self, outcome: &LineOutcome) {
        self.lines += 1;
        match outcome {
            LineOutcome::Keepalive => self.keepalives += 1,
            LineOutcome::Malformed(_) => self.decode_failures += 1,
            LineOutcome::Unmatched => {
                self.events += 1;
                self.unmatched += 1;
            }
            LineOutcome::Dispatched { .. } => {
                self.events += 1;
                self.dispatched += 1;
            }
        }
    }
}

fn preview(line: &[u8]) -> String {
    let end = line.len().min(MALFORMED_PREVIEW_LEN);
    String::from_utf8_lossy(&line[..end]).into_owned()
}

/// Streams flow activity and routes each event to at most one command.
///
/// The dispatcher owns its [`CommandRegistry`], so the set of commands is
/// fixed once it is constructed.
pub struct StreamDispatcher {
    config: StreamConfig,
    registry: CommandRegistry,
    client: reqwest::Client,
    state: RwLock<DispatcherState>,
}

impl StreamDispatcher {
    /// Create a dispatcher with its own HTTP client.
    pub fn new(config: StreamConfig, registry: CommandRegistry) -> Self {
        // No overall request timeout: the response body is unbounded.
        let client = reqwest::Client::builder()
            .user_agent(concat!("flowbot/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self::with_client(config, registry, client)
    }

    /// Create a dispatcher that shares an existing HTTP client.
    pub fn with_client(
        config: StreamConfig,
        registry: CommandRegistry,
        client: reqwest::Client,
    ) -> Self {
        Self {
            config,
            registry,
            client,
            state: RwLock::new(DispatcherState::Disconnected),
        }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn state(&self) -> DispatcherState {
        *self.state.read()
    }

    fn set_state(&self, state: DispatcherState) {
        *self.state.write() = state;
    }

    /// Stream until the connection fails or ends.
    ///
    /// Only returns `Ok` when shut down, which this variant never is.
    pub async fn run(&self) -> Result<DispatchStats, StreamError> {
        self.run_until(std::future::pending()).await
    }

    /// Stream until `shutdown` completes or the connection fails.
    ///
    /// A completed `shutdown` abandons the pending read, drops the
    /// connection and returns the run's counters. A handler that is already
    /// running is allowed to finish first.
    pub async fn run_until<F>(&self, shutdown: F) -> Result<DispatchStats, StreamError>
    where
        F: Future<Output = ()>,
    {
        let span = spans::stream(&self.config.url);
        self.run_inner(shutdown).instrument(span).await
    }

    async fn run_inner<F>(&self, shutdown: F) -> Result<DispatchStats, StreamError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut stats = DispatchStats::default();

        self.set_state(DispatcherState::Connecting);
        info!(url = %self.config.url, "Connecting to stream");

        let opened = tokio::select! {
            biased;
            _ = &mut shutdown => {
                self.set_state(DispatcherState::Stopped);
                info!("Shutdown requested before stream connected");
                return Ok(stats);
            }
            result = StreamSession::open(&self.client, &self.config) => result,
        };
        let mut session = opened.map_err(|e| self.fail(e, &stats))?;

        self.set_state(DispatcherState::Streaming);
        info!(commands = self.registry.len(), "Connected, reading stream");

        loop {
            let line = tokio::select! {
                biased;
                _ = &mut shutdown => {
                    self.set_state(DispatcherState::Stopped);
                    info!(?stats, "Shutdown requested, closing stream");
                    return Ok(stats);
                }
                line = session.next_line() => line,
            };

            let line = line.map_err(|e| self.fail(e, &stats))?;
            let outcome = self.dispatch_line(&line).await;
            stats.record(&outcome);
        }
    }

    fn fail(&self, error: StreamError, stats: &DispatchStats) -> StreamError {
        self.set_state(DispatcherState::Failed);
        crate::metrics::record_stream_error(error.error_code());
        warn!(error = %error, ?stats, "Stream run ended");
        error
    }

    /// Decode one stream line and run the first matching command.
    ///
    /// Malformed lines are reported and skipped; they never reach a handler.
    pub async fn dispatch_line(&self, line: &[u8]) -> LineOutcome {
        crate::metrics::record_line();
        if is_keepalive(line) {
            trace!("Keep-alive");
            crate::metrics::record_keepalive();
            return LineOutcome::Keepalive;
        }

        let event = match EventRecord::from_line(line) {
            Ok(event) => event,
            Err(e) => {
                crate::metrics::record_decode_failure();
                warn!(error = %e, line = %preview(line), "Skipping malformed stream line");
                return LineOutcome::Malformed(e);
            }
        };

        self.dispatch_event(&event).await
    }

    /// Run the first command whose pattern is found in `event.content`.
    pub async fn dispatch_event(&self, event: &EventRecord) -> LineOutcome {
        let Some(binding) = self.registry.find(&event.content) else {
            trace!(event = %event.event, flow = %event.flow, "No command matched");
            crate::metrics::record_unmatched();
            return LineOutcome::Unmatched;
        };

        debug!(pattern = %binding.as_str(), content = %event.content, "Command matched");
        let _timer = CommandTimer::new(binding.as_str());
        binding
            .handler()
            .handle(binding, event)
            .instrument(spans::command(binding.as_str(), event))
            .await;

        LineOutcome::Dispatched {
            pattern: binding.as_str().to_string(),
        }
    }
}
