//! Log Redaction
//!
//! Scrubs credentials out of tool arguments and free text before they reach the logs.
//! Viewers still see the raw values; only the log sink is scrubbed.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(sk-[a-zA-Z0-9]{32,})|(Bearer\s+[a-zA-Z0-9\-\._~+/]+=*)|(gh[pousr]_[A-Za-z0-9]{36,})",
    )
    .unwrap()
});

const SENSITIVE_KEYS: &[&str] = &[
    "password",
    "passcode",
    "token",
    "secret",
    "api_key",
    "apikey",
    "authorization",
];

pub const REDACTED: &str = "[REDACTED]";

/// Replaces token-shaped substrings.
pub fn redact_text(input: &str) -> String {
    TOKEN_RE.replace_all(input, "[REDACTED_TOKEN]").into_owned()
}

fn is_sensitive_key(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    SENSITIVE_KEYS.iter().any(|s| key.contains(s))
}

/// Copy of `arguments` with sensitive keys masked and token-shaped strings scrubbed,
/// at any depth.
pub fn redact_arguments(arguments: &Map<String, Value>) -> Map<String, Value> {
    arguments
        .iter()
        .map(|(k, v)| {
            let v = if is_sensitive_key(k) {
                Value::String(REDACTED.to_string())
            } else {
                redact_value(v)
            };
            (k.clone(), v)
        })
        .collect()
}

fn redact_value(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(redact_text(s)),
        Value::Array(items) => Value::Array(items.iter().map(redact_value).collect()),
        Value::Object(map) => Value::Object(redact_arguments(map)),
        other => other.clone(),
    }
}
