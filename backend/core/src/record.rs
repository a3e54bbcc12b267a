use std::time::Instant;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Results longer than this many characters are cut when sent to viewers.
pub const RESULT_PREVIEW_CHARS: usize = 500;

/// Named arguments of one tool invocation, in the order the caller supplied them.
pub type Arguments = Map<String, Value>;

/// Free-form key/value state such as device info or bridge status.
pub type Properties = Map<String, Value>;

/// Lifecycle of a record: `Pending` moves exactly once to a terminal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    Pending,
    Success,
    Error,
}

impl RecordStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, RecordStatus::Pending)
    }
}

impl std::fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RecordStatus::Pending => "pending",
            RecordStatus::Success => "success",
            RecordStatus::Error => "error",
        };
        f.write_str(s)
    }
}

/// How a tool invocation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(String),
    Failure(String),
}

impl Outcome {
    /// Build an outcome from an optional result and an optional error.
    ///
    /// A non-empty error always wins; otherwise the call succeeded, with an
    /// empty result when none was given.
    pub fn from_parts(result: Option<String>, error: Option<String>) -> Self {
        match error {
            Some(err) if !err.is_empty() => Outcome::Failure(err),
            _ => Outcome::Success(result.unwrap_or_default()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }
}

impl<E: std::fmt::Display> From<Result<String, E>> for Outcome {
    fn from(res: Result<String, E>) -> Self {
        match res {
            Ok(out) => Outcome::Success(out),
            Err(e) => Outcome::Failure(e.to_string()),
        }
    }
}

/// One logged tool invocation.
#[derive(Debug, Clone)]
pub struct Record {
    pub id: u64,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub arguments: Arguments,
    pub status: RecordStatus,
    pub result: Option<String>,
    pub error: Option<String>,
    pub duration_ms: Option<f64>,
    started: Instant,
}

impl Record {
    pub(crate) fn pending(id: u64, name: String, arguments: Arguments) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            name,
            arguments,
            status: RecordStatus::Pending,
            result: None,
            error: None,
            duration_ms: None,
            started: Instant::now(),
        }
    }

    /// Apply the terminal outcome. Callers must have checked the status is still pending.
    pub(crate) fn finish(&mut self, outcome: Outcome) {
        self.duration_ms = Some(self.started.elapsed().as_secs_f64() * 1000.0);
        match outcome {
            Outcome::Success(result) => {
                self.status = RecordStatus::Success;
                self.result = Some(result);
                self.error = None;
            }
            Outcome::Failure(error) => {
                self.status = RecordStatus::Error;
                self.error = Some(error);
                self.result = None;
            }
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == RecordStatus::Pending
    }

    /// Wire form of this record, with the result preview applied.
    pub fn view(&self) -> RecordView {
        RecordView {
            id: self.id,
            created_at: self.created_at,
            time_label: self
                .created_at
                .with_timezone(&Local)
                .format("%H:%M:%S")
                .to_string(),
            name: self.name.clone(),
            arguments: self.arguments.clone(),
            status: self.status,
            result: self.result.as_deref().map(preview),
            error: self.error.clone(),
            duration_ms: self.duration_ms,
        }
    }
}

/// Serialized record as pushed to viewers and returned by the state query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordView {
    pub id: u64,
    pub created_at: DateTime<Utc>,
    pub time_label: String,
    pub name: String,
    pub arguments: Arguments,
    pub status: RecordStatus,
    pub result: Option<String>,
    pub error: Option<String>,
    pub duration_ms: Option<f64>,
}

fn preview(text: &str) -> String {
    match text.char_indices().nth(RESULT_PREVIEW_CHARS) {
        Some((cut, _)) => text[..cut].to_string(),
        None => text.to_string(),
    }
}
