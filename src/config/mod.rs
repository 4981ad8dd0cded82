// Configuration module entry point
// Loads layered configuration and holds the shared application state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{Config, LoggingConfig};

/// Default config file, resolved without extension by the `config` crate
pub const DEFAULT_CONFIG_PATH: &str = "config";

/// Environment overrides picked up at load time
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    pub port: Option<String>,
    pub environment: Option<String>,
}

impl EnvOverrides {
    /// Read `PORT` and `APP_ENV` (falling back to `NODE_ENV`) from the process environment
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("PORT").ok().filter(|v| !v.is_empty()),
            environment: std::env::var("APP_ENV")
                .or_else(|_| std::env::var("NODE_ENV"))
                .ok()
                .filter(|v| !v.is_empty()),
        }
    }
}

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        Self::load_with(config_path, &EnvOverrides::from_env())
    }

    /// Load configuration with explicit environment overrides
    pub fn load_with(
        config_path: &str,
        overrides: &EnvOverrides,
    ) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("server.keep_alive", true)?
            .set_default("app.environment", "development")?
            .add_source(config::File::with_name(config_path).required(false))
            .set_override_option("server.port", overrides.port.clone())?
            .set_override_option("app.environment", overrides.environment.clone())?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
