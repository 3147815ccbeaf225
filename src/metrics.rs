//! Prometheus metrics collection for flowbot.
//!
//! Tracks stream health, command dispatch and outbound sends. Metrics live in
//! `OnceLock` statics and recording is a no-op until [`init`] has run, so the
//! library can be embedded without a metrics endpoint.
//!
//! - `flowbot_lines_total` - Lines read from the stream, keep-alives included
//! - `flowbot_keepalives_total` - Keep-alive lines
//! - `flowbot_decode_failures_total` - Lines skipped as malformed
//! - `flowbot_unmatched_total` - Events no command matched
//! - `flowbot_commands_total{pattern}` - Handler invocations by pattern
//! - `flowbot_command_duration_seconds{pattern}` - Handler latency histogram
//! - `flowbot_messages_sent_total{kind}` - Successful chat/inbox posts
//! - `flowbot_send_errors_total{kind,error}` - Failed posts
//! - `flowbot_stream_errors_total{error}` - Streaming runs ended by an error

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::OnceLock;

/// Global Prometheus registry for all metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

// ========================================================================
// Counters
// ========================================================================

pub static LINES_READ: OnceLock<IntCounter> = OnceLock::new();

pub static KEEPALIVES: OnceLock<IntCounter> = OnceLock::new();

pub static DECODE_FAILURES: OnceLock<IntCounter> = OnceLock::new();

pub static UNMATCHED_EVENTS: OnceLock<IntCounter> = OnceLock::new();

/// Handler invocations by command pattern.
pub static COMMAND_COUNTER: OnceLock<IntCounterVec> = OnceLock::new();

/// Handler latency by command pattern.
pub static COMMAND_LATENCY: OnceLock<HistogramVec> = OnceLock::new();

pub static MESSAGES_SENT: OnceLock<IntCounterVec> = OnceLock::new();

pub static SEND_ERRORS: OnceLock<IntCounterVec> = OnceLock::new();

pub static STREAM_ERRORS: OnceLock<IntCounterVec> = OnceLock::new();

/// Initialize the Prometheus metrics registry.
///
/// Safe to call more than once; only the first call registers anything.
pub fn init() {
    let r = registry();

    // Helper macro to register metric
    macro_rules! register {
        ($metric:ident, $init:expr) => {
            if $metric.get().is_none() {
                match $init {
                    Ok(m) => {
                        if let Err(e) = r.register(Box::new(m.clone())) {
                            tracing::warn!(
                                error = %e,
                                concat!("Failed to register metric ", stringify!($metric))
                            );
                        }
                        let _ = $metric.set(m);
                    }
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            concat!("Failed to create metric ", stringify!($metric))
                        );
                    }
                }
            }
        };
    }

    register!(LINES_READ, IntCounter::new("flowbot_lines_total", "Stream lines read"));
    register!(
        KEEPALIVES,
        IntCounter::new("flowbot_keepalives_total", "Keep-alive lines read")
    );
    register!(
        DECODE_FAILURES,
        IntCounter::new("flowbot_decode_failures_total", "Stream lines skipped as malformed")
    );
    register!(
        UNMATCHED_EVENTS,
        IntCounter::new("flowbot_unmatched_total", "Events no command matched")
    );

    register!(
        COMMAND_COUNTER,
        IntCounterVec::new(
            Opts::new("flowbot_commands_total", "Command handler invocations by pattern"),
            &["pattern"]
        )
    );
    register!(
        COMMAND_LATENCY,
        HistogramVec::new(
            HistogramOpts::new(
                "flowbot_command_duration_seconds",
                "Command handler latency by pattern",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
            &["pattern"]
        )
    );
    register!(
        MESSAGES_SENT,
        IntCounterVec::new(
            Opts::new("flowbot_messages_sent_total", "Messages posted by kind"),
            &["kind"]
        )
    );
    register!(
        SEND_ERRORS,
        IntCounterVec::new(
            Opts::new("flowbot_send_errors_total", "Failed posts by kind and error"),
            &["kind", "error"]
        )
    );
    register!(
        STREAM_ERRORS,
        IntCounterVec::new(
            Opts::new("flowbot_stream_errors_total", "Streaming runs ended by error"),
            &["error"]
        )
    );
}

/// Gather all metrics in Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = registry().gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode Prometheus metrics");
        return String::new();
    }
    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Prometheus metrics were not valid UTF-8");
            String::new()
        }
    }
}

// ============================================================================
// Helper functions
// ============================================================================

#[inline]
fn inc(metric: &OnceLock<IntCounter>) {
    if let Some(c) = metric.get() {
        c.inc();
    }
}

#[inline]
pub fn record_line() {
    inc(&LINES_READ);
}

#[inline]
pub fn record_keepalive() {
    inc(&KEEPALIVES);
}

#[inline]
pub fn record_decode_failure() {
    inc(&DECODE_FAILURES);
}

#[inline]
pub fn record_unmatched() {
    inc(&UNMATCHED_EVENTS);
}

/// Record a handler invocation and its latency.
#[inline]
pub fn record_command(pattern: &str, duration_secs: f64) {
    if let Some(c) = COMMAND_COUNTER.get() {
        c.with_label_values(&[pattern]).inc();
    }
    if let Some(h) = COMMAND_LATENCY.get() {
        h.with_label_values(&[pattern]).observe(duration_secs);
    }
}

#[inline]
pub fn record_sent(kind: &str) {
    if let Some(c) = MESSAGES_SENT.get() {
        c.with_label_values(&[kind]).inc();
    }
}

#[inline]
pub fn record_send_error(kind: &str, error: &str) {
    if let Some(c) = SEND_ERRORS.get() {
        c.with_label_values(&[kind, error]).inc();
    }
}

#[inline]
pub fn record_stream_error(error: &str) {
    if let Some(c) = STREAM_ERRORS.get() {
        c.with_label_values(&[error]).inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_and_gather() {
        init();
        init();
        record_line();
        record_command("^ping", 0.002);
        record_send_error("chat", "status");

        let text = gather_metrics();
        assert!(text.contains("flowbot_lines_total"));
        assert!(text.contains("flowbot_keepalives_total"));
        assert!(text.contains("flowbot_commands_total{pattern=\"^ping\"}"));
        assert!(text.contains("flowbot_send_errors_total"));
    }
}
