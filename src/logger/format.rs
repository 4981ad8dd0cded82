//! Log entry format module
//!
//! Every entry is one JSON object on one line:
//! `{"timestamp":"...","level":"info","message":"...", <context keys>}`

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

/// Severity of a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Error,
}

/// A single structured log record
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    /// ISO 8601 UTC timestamp with millisecond precision
    pub timestamp: String,
    pub level: Level,
    pub message: String,
    /// Arbitrary key/value context, flattened into the top-level object
    #[serde(flatten)]
    pub context: Map<String, Value>,
}

impl LogEntry {
    /// Create a new entry stamped with the current time
    ///
    /// An object `context` is flattened as-is; any other non-null value is
    /// kept under a `data` key.
    pub fn new(level: Level, message: &str, context: Value) -> Self {
        let context = match context {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("data".to_string(), other);
                map
            }
        };

        Self {
            timestamp: timestamp(),
            level,
            message: message.to_string(),
            context,
        }
    }

    /// Serialize to a single JSON line (no trailing newline)
    pub fn to_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(
                r#"{{"timestamp":"{}","level":"error","message":"Failed to serialize log entry: {}"}}"#,
                self.timestamp,
                e.to_string().replace('"', "'")
            )
        })
    }
}

/// Current UTC time as ISO 8601, e.g. `2024-05-01T12:00:00.123Z`
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
