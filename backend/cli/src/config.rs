use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;
use simdash_core::store::{DEFAULT_CAPACITY, DEFAULT_SNAPSHOT_LIMIT};
use simdash_core::StoreConfig;
use simdash_gateway::server::DEFAULT_VIEWER_BUFFER;

/// Dashboard runtime configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// HTTP server bind address
    pub bind_address: String,
    /// HTTP server port
    pub port: u16,
    /// Records kept in memory
    pub max_records: usize,
    /// Records sent in a snapshot
    pub snapshot_records: usize,
    /// Pending messages per viewer before it is dropped
    pub viewer_buffer: usize,
    /// Directory for the NDJSON log file; empty disables it
    pub log_dir: Option<PathBuf>,
    /// Log level
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8200,
            max_records: DEFAULT_CAPACITY,
            snapshot_records: DEFAULT_SNAPSHOT_LIMIT,
            viewer_buffer: DEFAULT_VIEWER_BUFFER,
            log_dir: Some(PathBuf::from("logs")),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            bind_address: var("DASHBOARD_BIND").unwrap_or(defaults.bind_address),
            port: parsed(&var, "DASHBOARD_PORT").unwrap_or(defaults.port),
            max_records: parsed(&var, "DASHBOARD_MAX_RECORDS").unwrap_or(defaults.max_records),
            snapshot_records: parsed(&var, "DASHBOARD_SNAPSHOT_RECORDS")
                .unwrap_or(defaults.snapshot_records),
            viewer_buffer: parsed(&var, "DASHBOARD_VIEWER_BUFFER")
                .unwrap_or(defaults.viewer_buffer),
            log_dir: match var("DASHBOARD_LOG_DIR") {
                Some(dir) if dir.is_empty() => None,
                Some(dir) => Some(PathBuf::from(dir)),
                None => defaults.log_dir,
            },
            log_level: var("RUST_LOG").unwrap_or(defaults.log_level),
        }
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            capacity: self.max_records,
            snapshot_limit: self.snapshot_records,
        }
    }
}

fn parsed<T: FromStr>(var: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    var(key).and_then(|v| v.trim().parse().ok())
}
