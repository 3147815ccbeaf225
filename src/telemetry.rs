//! Telemetry utilities for command timing and event correlation.

use std::time::Instant;

/// Guard for timing handler execution and recording metrics.
///
/// Records command latency when dropped.
pub struct CommandTimer {
    pattern: String,
    start: Instant,
}

impl CommandTimer {
    /// Start timing a handler run for `pattern`.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            start: Instant::now(),
        }
    }
}

impl Drop for CommandTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        crate::metrics::record_command(&self.pattern, duration);
    }
}

/// Standardized span constructors for flow observability.
pub mod spans {
    use flowbot_proto::EventRecord;
    use tracing::{Span, debug_span, info_span};

    /// Span for one streaming session.
    pub fn stream(url: &str) -> Span {
        info_span!("flowbot.stream", url = %url)
    }

    /// Span for one handler invocation.
    pub fn command(pattern: &str, event: &EventRecord) -> Span {
        if let Some(thread) = event.thread_id() {
            debug_span!(
                "flowbot.command",
                pattern = %pattern,
                flow = %event.flow,
                id = event.id,
                thread = %thread
            )
        } else {
            debug_span!("flowbot.command", pattern = %pattern, flow = %event.flow, id = event.id)
        }
    }
}
