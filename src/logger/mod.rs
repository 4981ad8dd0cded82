//! Logger module
//!
//! Structured JSON logging for the HTTP service:
//! - One JSON object per line (`timestamp`, `level`, `message`, context)
//! - stdout by default, optional append-mode log file
//! - Every entry is written; `level` is a field, not a filter

mod format;
pub mod writer;

pub use format::{timestamp, Level, LogEntry};

use crate::config::{Config, LoggingConfig};
use serde_json::{json, Value};
use std::io;
use writer::LogWriter;

/// Structured logger shared through `AppState`
pub struct Logger {
    writer: LogWriter,
}

impl Logger {
    /// Build a logger from configuration
    pub fn from_config(config: &LoggingConfig) -> io::Result<Self> {
        Ok(Self {
            writer: LogWriter::new(config.file.as_deref())?,
        })
    }

    /// Logger writing to stderr, leaving stdout to the command's own output
    pub const fn stderr() -> Self {
        Self {
            writer: LogWriter::stderr(),
        }
    }

    pub fn info(&self, message: &str, context: Value) {
        self.log(Level::Info, message, context);
    }

    pub fn error(&self, message: &str, context: Value) {
        self.log(Level::Error, message, context);
    }

    /// Emit one entry. Never fails from the caller's point of view.
    pub fn log(&self, level: Level, message: &str, context: Value) {
        let entry = LogEntry::new(level, message, context);
        self.writer.write_line(&entry.to_line());
    }
}

/// Log the single startup entry
pub fn log_server_start(logger: &Logger, port: u16, config: &Config) {
    logger.info(
        "Server started",
        json!({
            "port": port,
            "host": config.server.host,
            "environment": config.app.environment,
            "version": env!("CARGO_PKG_VERSION"),
            "platform": std::env::consts::OS,
            "arch": std::env::consts::ARCH,
            "pid": std::process::id(),
        }),
    );
}

#[cfg(test)]
impl Logger {
    /// Logger capturing entries in memory
    pub const fn memory() -> Self {
        Self {
            writer: LogWriter::memory(),
        }
    }

    /// Captured lines, exactly as written
    pub fn lines(&self) -> Vec<String> {
        self.writer.captured()
    }

    /// Captured entries, parsed back into JSON
    pub fn entries(&self) -> Vec<Value> {
        self.lines()
            .iter()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }
}
