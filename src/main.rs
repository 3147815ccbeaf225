//! flowbot - Flowdock robot
//!
//! Follows one flow's stream and answers the stock commands until Ctrl-C or
//! a fatal stream error.

use flowbot::commands::register_builtin;
use flowbot::config::{self, Config, LogFormat};
use flowbot::{CommandRegistry, Sender, StreamDispatcher, http, metrics};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    match format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "flowbot.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        eprintln!("Failed to load config {config_path}: {e}");
        e
    })?;

    init_tracing(config.logging.format);

    if let Err(errors) = config::validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        return Err(anyhow::anyhow!(
            "{} configuration error(s) in {}",
            errors.len(),
            config_path
        ));
    }

    info!(
        robot = %config.robot.name,
        stream = %config.flowdock.stream_url,
        "Starting flowbot"
    );

    // Prometheus metrics are optional.
    // Convention: port = 0 disables the HTTP endpoint (used by tests).
    match config.metrics.port {
        Some(port) if port != 0 => {
            metrics::init();
            tokio::spawn(async move {
                if let Err(e) = http::run_http_server(port).await {
                    error!(port, error = %e, "Metrics endpoint failed");
                }
            });
        }
        _ => info!("Metrics disabled"),
    }

    let sender = Sender::new(&config)?;
    let mut registry = CommandRegistry::new();
    register_builtin(&mut registry, &sender)?;

    let dispatcher = StreamDispatcher::new(config.stream_config(), registry);
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    match dispatcher.run_until(shutdown).await {
        Ok(stats) => {
            info!(
                events = stats.events,
                dispatched = stats.dispatched,
                decode_failures = stats.decode_failures,
                "flowbot stopped"
            );
            Ok(())
        }
        Err(e) => {
            error!(error = %e, code = e.error_code(), "Stream failed");
            Err(e.into())
        }
    }
}
