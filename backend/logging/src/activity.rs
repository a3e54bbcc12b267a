//! Tool Activity Log
//!
//! One structured event per tool-call lifecycle step, on the `tool_activity` target,
//! so the file log carries an NDJSON trail of everything the dashboard showed.

use chrono::{DateTime, Utc};
use serde::Serialize;
use simdash_core::{Record, RecordStatus};
use tracing::{info, warn};

use crate::redact::{redact_arguments, redact_text};

pub const ACTIVITY_TARGET: &str = "tool_activity";

#[derive(Debug, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ActivityStep {
    Begin {
        arguments_json: String,
    },
    Complete {
        status: RecordStatus,
        duration_ms: Option<f64>,
        error: Option<String>,
    },
}

#[derive(Debug, Serialize)]
pub struct ActivityEntry {
    pub record_id: u64,
    pub tool_name: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub step: ActivityStep,
}

impl ActivityEntry {
    /// Entry for a freshly started record, with credentials scrubbed from its arguments.
    pub fn begin(record: &Record) -> Self {
        let arguments = redact_arguments(&record.arguments);
        Self {
            record_id: record.id,
            tool_name: record.name.clone(),
            timestamp: record.created_at,
            step: ActivityStep::Begin {
                arguments_json: serde_json::Value::Object(arguments).to_string(),
            },
        }
    }

    pub fn complete(record: &Record) -> Self {
        Self {
            record_id: record.id,
            tool_name: record.name.clone(),
            timestamp: Utc::now(),
            step: ActivityStep::Complete {
                status: record.status,
                duration_ms: record.duration_ms,
                error: record.error.as_deref().map(redact_text),
            },
        }
    }
}

pub struct ActivityLog;

impl ActivityLog {
    pub fn begin(record: &Record) {
        let entry = ActivityEntry::begin(record);
        info!(
            target: ACTIVITY_TARGET,
            record_id = entry.record_id,
            tool = %entry.tool_name,
            entry = ?entry,
            "Tool call started"
        );
    }

    pub fn complete(record: &Record) {
        let entry = ActivityEntry::complete(record);
        if record.status == RecordStatus::Error {
            warn!(
                target: ACTIVITY_TARGET,
                record_id = entry.record_id,
                tool = %entry.tool_name,
                entry = ?entry,
                "Tool call failed"
            );
        } else {
            info!(
                target: ACTIVITY_TARGET,
                record_id = entry.record_id,
                tool = %entry.tool_name,
                entry = ?entry,
                "Tool call finished"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use simdash_core::{EventStore, Outcome};

    #[test]
    fn test_begin_entry_scrubs_arguments() {
        let mut store = EventStore::new();
        let Value::Object(args) = json!({"text": "hello", "password": "pw"}) else {
            unreachable!()
        };
        let record = store.begin("type_text", args);

        let entry = ActivityEntry::begin(&record);
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["step"], "begin");
        assert_eq!(value["tool_name"], "type_text");
        let logged = value["arguments_json"].as_str().unwrap();
        assert!(logged.contains("hello"));
        assert!(!logged.contains("\"pw\""));
    }

    #[test]
    fn test_complete_entry_carries_status() {
        let mut store = EventStore::new();
        let record = store.begin("tap", Default::default());
        let done = store
            .complete(record.id, Outcome::Failure("no element".into()))
            .unwrap();

        let value = serde_json::to_value(ActivityEntry::complete(&done)).unwrap();
        assert_eq!(value["step"], "complete");
        assert_eq!(value["status"], "error");
        assert_eq!(value["error"], "no element");
        assert!(value["duration_ms"].is_number());
    }
}
