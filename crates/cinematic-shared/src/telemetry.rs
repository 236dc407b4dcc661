//! Telemetry setup

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::error::AppError;

/// Install the global subscriber.
///
/// `RUST_LOG` overrides `default_filter`. `LOG_FORMAT=json` switches stdout to JSON,
/// and `LOG_DIR` adds a daily rolling file next to it.
pub fn init_telemetry(default_filter: &str) -> Result<(), AppError> {
    let filter = match std::env::var("RUST_LOG") {
        Ok(directives) => EnvFilter::try_new(directives),
        Err(_) => EnvFilter::try_new(default_filter),
    }
    .map_err(|e| AppError::TelemetryError(e.to_string()))?;

    let json = std::env::var("LOG_FORMAT").map(|f| f == "json").unwrap_or(false);

    let stdout_layer = if json {
        fmt::layer().json().with_target(true).with_thread_ids(true).boxed()
    } else {
        fmt::layer().with_target(true).boxed()
    };

    let file_layer = match std::env::var("LOG_DIR") {
        Ok(dir) => {
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("cinematic")
                .filename_suffix("log")
                .build(dir)
                .map_err(|e| AppError::TelemetryError(e.to_string()))?;
            Some(fmt::layer().with_writer(appender).with_ansi(false).boxed())
        }
        Err(_) => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| AppError::TelemetryError(e.to_string()))
}
