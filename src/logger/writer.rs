//! Log writer module
//!
//! Thread-safe line writer targeting stdout, stderr or an append-mode file.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

/// Log output target
enum LogTarget {
    /// Write to stdout
    Stdout,
    /// Write to stderr
    Stderr,
    /// Write to file
    File(File),
    /// Keep lines in memory
    #[cfg(test)]
    Memory(Vec<String>),
}

/// Thread-safe log writer
pub struct LogWriter {
    target: Mutex<LogTarget>,
}

impl LogWriter {
    /// Create a writer for the optional file path, stdout otherwise
    pub fn new(log_file: Option<&str>) -> io::Result<Self> {
        let target = match log_file {
            Some(path) => LogTarget::File(open_log_file(path)?),
            None => LogTarget::Stdout,
        };

        Ok(Self {
            target: Mutex::new(target),
        })
    }

    pub const fn stderr() -> Self {
        Self {
            target: Mutex::new(LogTarget::Stderr),
        }
    }

    #[cfg(test)]
    pub const fn memory() -> Self {
        Self {
            target: Mutex::new(LogTarget::Memory(Vec::new())),
        }
    }

    /// Write one line. Failures are dropped.
    pub fn write_line(&self, line: &str) {
        let Ok(mut target) = self.target.lock() else {
            return;
        };
        match &mut *target {
            LogTarget::Stdout => {
                let mut out = io::stdout().lock();
                let _ = writeln!(out, "{line}");
            }
            LogTarget::Stderr => {
                let mut err = io::stderr().lock();
                let _ = writeln!(err, "{line}");
            }
            LogTarget::File(file) => {
                let _ = writeln!(file, "{line}");
            }
            #[cfg(test)]
            LogTarget::Memory(lines) => lines.push(line.to_string()),
        }
    }

    /// Lines captured by a memory writer
    #[cfg(test)]
    pub fn captured(&self) -> Vec<String> {
        match &*self.target.lock().unwrap() {
            LogTarget::Memory(lines) => lines.clone(),
            _ => Vec::new(),
        }
    }
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> io::Result<File> {
    // Create parent directories if they don't exist
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}
