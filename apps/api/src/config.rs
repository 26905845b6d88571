//! API server configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use farmacia_db::DbConfig;

/// API server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Address the HTTP listener binds to
    pub bind_addr: String,

    /// HTTP port
    pub http_port: u16,

    /// SQLite database file
    pub database_path: String,

    /// Connection pool size
    pub db_max_connections: u32,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            bind_addr: "0.0.0.0".to_string(),
            http_port: 8080,
            database_path: "./farmacia.db".to_string(),
            db_max_connections: 5,
            request_timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup (the environment in
    /// production, a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = ApiConfig::default();

        let config = ApiConfig {
            bind_addr: lookup("FARMACIA_BIND_ADDR").unwrap_or(defaults.bind_addr),

            http_port: parse_or(&lookup, "FARMACIA_HTTP_PORT", defaults.http_port)?,

            database_path: lookup("FARMACIA_DATABASE_PATH").unwrap_or(defaults.database_path),

            db_max_connections: parse_or(
                &lookup,
                "FARMACIA_DB_MAX_CONNECTIONS",
                defaults.db_max_connections,
            )?,

            request_timeout_secs: parse_or(
                &lookup,
                "FARMACIA_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout_secs,
            )?,
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "FARMACIA_DB_MAX_CONNECTIONS".to_string(),
            ));
        }
        if config.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "FARMACIA_REQUEST_TIMEOUT_SECS".to_string(),
            ));
        }

        Ok(config)
    }

    /// `bind_addr:http_port`
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.http_port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Database settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path).max_connections(self.db_max_connections)
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
