use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer, fmt::time::ChronoUtc, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingConfig};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the lifetime of the process.
pub fn init(config: &LoggingConfig) -> Result<Option<WorkerGuard>, String> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| format!("invalid log filter '{}': {e}", config.level))?;

    let stdout = match config.format {
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .with_timer(ChronoUtc::new(TIMESTAMP_FORMAT.to_string()))
            .with_target(true)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_timer(ChronoUtc::new(TIMESTAMP_FORMAT.to_string()))
            .with_current_span(true)
            .boxed(),
    };

    let (file, guard) = match &config.directory {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "cinemontauge.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_timer(ChronoUtc::new(TIMESTAMP_FORMAT.to_string()))
                .with_writer(writer)
                .with_ansi(false)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout)
        .with(file)
        .try_init()
        .map_err(|e| format!("failed to install tracing subscriber: {e}"))?;

    Ok(guard)
}
