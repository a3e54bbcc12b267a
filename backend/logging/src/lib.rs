//! Logging for simdash.
//!
//! Subscriber setup with a rolling NDJSON file, credential redaction, and the
//! per-tool-call activity trail.

pub mod activity;
pub mod logger;
pub mod redact;

pub use activity::{ActivityEntry, ActivityLog, ActivityStep, ACTIVITY_TARGET};
pub use logger::{init_logger, LoggerOptions, LOG_FILE_PREFIX};
pub use redact::{redact_arguments, redact_text};
