// Application state module
// Shared by every connection task for the lifetime of the process

use std::sync::Arc;
use std::time::Instant;

use super::types::Config;
use crate::logger::Logger;

/// Application state
pub struct AppState {
    pub config: Config,
    pub logger: Arc<Logger>,
    /// Captured once in `main` before anything else runs
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: Config, logger: Arc<Logger>, started_at: Instant) -> Self {
        Self {
            config,
            logger,
            started_at,
        }
    }

    /// Seconds elapsed since the process started
    pub fn uptime_secs(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }
}
