//! API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable                      | Default                 |
//! |-------------------------------|-------------------------|
//! | `FREIGHT_DB_PATH`             | `./freight.db`          |
//! | `FREIGHT_DB_MAX_CONNECTIONS`  | `5`                     |
//! | `FREIGHT_JWT_SECRET`          | development secret      |
//! | `FREIGHT_JWT_LIFESPAN_HOURS`  | `24` (`0` = no expiry, at most 100 years) |

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use tracing::warn;

use freight_db::DbConfig;

const DEV_JWT_SECRET: &str = "freight-dev-secret-change-in-production";

/// Longest accepted token lifetime: one hundred years.
pub const MAX_JWT_LIFESPAN_HOURS: i64 = 24 * 365 * 100;

/// API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// SQLite database file (`:memory:` for a throwaway database)
    pub database_path: PathBuf,

    /// Pool size
    pub db_max_connections: u32,

    /// HS256 signing key
    #[serde(skip_serializing)]
    pub jwt_secret: String,

    /// Token lifetime in hours; 0 issues tokens without expiry
    pub jwt_lifespan_hours: i64,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_source(|key| env::var(key).ok())
    }

    /// Load configuration from any key/value source.
    pub fn from_source(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let jwt_secret = match get("FREIGHT_JWT_SECRET") {
            Some(secret) if secret.is_empty() => {
                return Err(ConfigError::InvalidValue("FREIGHT_JWT_SECRET".to_string()))
            }
            Some(secret) => secret,
            None => {
                // In production, this MUST be set via environment variable
                warn!("FREIGHT_JWT_SECRET not set, using the development secret");
                DEV_JWT_SECRET.to_string()
            }
        };

        let config = ApiConfig {
            database_path: get("FREIGHT_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./freight.db")),

            db_max_connections: get("FREIGHT_DB_MAX_CONNECTIONS")
                .unwrap_or_else(|| "5".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("FREIGHT_DB_MAX_CONNECTIONS".to_string()))?,

            jwt_secret,

            jwt_lifespan_hours: get("FREIGHT_JWT_LIFESPAN_HOURS")
                .unwrap_or_else(|| "24".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("FREIGHT_JWT_LIFESPAN_HOURS".to_string()))?,
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "FREIGHT_DB_MAX_CONNECTIONS".to_string(),
            ));
        }
        if !(0..=MAX_JWT_LIFESPAN_HOURS).contains(&config.jwt_lifespan_hours) {
            return Err(ConfigError::InvalidValue(
                "FREIGHT_JWT_LIFESPAN_HOURS".to_string(),
            ));
        }

        Ok(config)
    }

    /// Pool settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        if self.database_path.as_os_str() == freight_db::pool::IN_MEMORY_PATH {
            return DbConfig::in_memory();
        }
        DbConfig::new(&self.database_path).max_connections(self.db_max_connections)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
