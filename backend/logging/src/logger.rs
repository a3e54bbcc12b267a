//! Structured Logger
//!
//! Console output plus an optional daily-rolling NDJSON file, filtered by
//! `RUST_LOG` or the configured level.

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// File name prefix of the rolling log (`simdash.log.YYYY-MM-DD`).
pub const LOG_FILE_PREFIX: &str = "simdash.log";

#[derive(Debug, Clone)]
pub struct LoggerOptions {
    /// Fallback filter when `RUST_LOG` is unset, e.g. `info` or `simdash_gateway=debug`.
    pub level: String,
    /// Directory for the NDJSON file log. `None` logs to the console only.
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggerOptions {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
        }
    }
}

/// Install the global subscriber. Returns `false` if one was already installed.
pub fn init_logger(options: &LoggerOptions) -> bool {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&options.level));

    let file_layer = options.log_dir.as_ref().map(|dir| {
        let appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
        fmt::layer().json().with_writer(appender).with_ansi(false)
    });

    let console_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(false)
        .with_ansi(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .is_ok()
}
