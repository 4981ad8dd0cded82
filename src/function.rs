//! Standalone function handler
//!
//! Serverless-style handler returning a fixed JSON payload. It shares the
//! logger but nothing else with the HTTP service; `hello-service invoke`
//! feeds it an event from stdin and prints only the response on stdout.

use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::io::{self, Read, Write};

use crate::logger::{self, Logger};

/// Response envelope in the API-gateway proxy shape
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    /// JSON document encoded as a string
    pub body: String,
}

#[derive(Serialize)]
struct Payload {
    message: &'static str,
    timestamp: String,
    status: &'static str,
}

/// Handle one invocation event
pub fn handle(event: &Value, logger: &Logger) -> FunctionResponse {
    logger.info("Test endpoint invoked", json!({ "event": event }));

    let payload = Payload {
        message: "Hello from Lambda!",
        timestamp: logger::timestamp(),
        status: "success",
    };

    FunctionResponse {
        status_code: 200,
        headers: BTreeMap::from([("Content-Type".to_string(), "application/json".to_string())]),
        body: serde_json::to_string(&payload).unwrap_or_default(),
    }
}

/// Parse an event document; blank input is an empty event
pub fn parse_event(input: &str) -> Result<Value, serde_json::Error> {
    if input.trim().is_empty() {
        return Ok(Value::Object(serde_json::Map::new()));
    }
    serde_json::from_str(input)
}

/// Read an event from `input`, run the handler and write the response line to `output`
///
/// Log entries go to `logger` only, so `output` carries a single JSON document.
pub fn invoke<R: Read, W: Write>(
    mut input: R,
    mut output: W,
    logger: &Logger,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut raw = String::new();
    input.read_to_string(&mut raw)?;

    let event = parse_event(&raw).map_err(|e| format!("Invalid event JSON: {e}"))?;
    let response = handle(&event, logger);
    writeln!(output, "{}", serde_json::to_string(&response)?)?;
    output.flush()?;
    Ok(())
}

/// `hello-service invoke`: stdin to stdout, log entries on stderr
pub fn invoke_from_stdin() -> Result<(), Box<dyn std::error::Error>> {
    invoke(io::stdin().lock(), io::stdout().lock(), &Logger::stderr())
}
