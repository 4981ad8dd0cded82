// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub app: AppConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// HTTP/1.1 keep-alive on accepted connections
    pub keep_alive: bool,
}

/// Application identity reported at startup
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Deployment environment name (development, production, ...)
    pub environment: String,
}

/// Logging configuration
///
/// Every entry is always written; there is no level filter.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct LoggingConfig {
    /// Log file path (optional, stdout if not set)
    #[serde(default)]
    pub file: Option<String>,
}
