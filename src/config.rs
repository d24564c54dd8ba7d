//! Store configuration and connection pool construction.
//!
//! Settings come from a JSON document or from environment variables. The
//! environment is read through a caller-supplied lookup so tests never touch
//! the process environment.
//!
//! # Example
//!
//! ```
//! use kanban_core::config::StoreConfig;
//!
//! let config = StoreConfig::from_json(r#"{"database_url": "postgres://localhost/kanban"}"#)
//!     .expect("valid configuration");
//! assert_eq!(config.max_connections, 10);
//! ```

use crate::board::adapters::postgres::BoardPgPool;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Variable holding the `PostgreSQL` connection URL.
pub const DATABASE_URL_VAR: &str = "KANBAN_DATABASE_URL";
/// Variable holding the maximum pool size.
pub const MAX_CONNECTIONS_VAR: &str = "KANBAN_DB_MAX_CONNECTIONS";
/// Variable holding the connection timeout in seconds.
pub const CONNECT_TIMEOUT_VAR: &str = "KANBAN_DB_CONNECT_TIMEOUT_SECS";

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Settings for the `PostgreSQL` board store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// `PostgreSQL` connection URL.
    pub database_url: String,
    /// Maximum number of pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Seconds to wait for a pooled connection.
    #[serde(default = "default_connect_timeout_secs")]
    pub connection_timeout_secs: u64,
}

const fn default_max_connections() -> u32 {
    DEFAULT_MAX_CONNECTIONS
}

const fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

/// Errors raised while loading configuration or building the pool.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("missing required setting {0}")]
    Missing(&'static str),

    /// A variable is set but cannot be parsed.
    #[error("invalid value for {name}: {value}")]
    Invalid {
        /// Name of the setting.
        name: &'static str,
        /// Raw value supplied.
        value: String,
    },

    /// The JSON document is malformed.
    #[error("failed to parse store configuration: {0}")]
    Parse(#[source] serde_json::Error),

    /// The connection pool could not be created.
    #[error("failed to build connection pool: {0}")]
    Pool(#[source] diesel::r2d2::PoolError),
}

impl StoreConfig {
    /// Creates a configuration with default pool settings.
    #[must_use]
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            connection_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }

    /// Parses a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the document is malformed and
    /// [`ConfigError::Invalid`] when a value is out of range.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(ConfigError::Parse)?;
        config.validated()
    }

    /// Reads settings through `lookup`, typically `|name| std::env::var(name).ok()`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when the database URL is unset and
    /// [`ConfigError::Invalid`] when a numeric setting cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup(DATABASE_URL_VAR)
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::Missing(DATABASE_URL_VAR))?;
        let max_connections = parse_setting(&lookup, MAX_CONNECTIONS_VAR)?
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);
        let connection_timeout_secs = parse_setting(&lookup, CONNECT_TIMEOUT_VAR)?
            .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS);
        Self {
            database_url,
            max_connections,
            connection_timeout_secs,
        }
        .validated()
    }

    /// Reads settings from the process environment.
    ///
    /// # Errors
    ///
    /// See [`StoreConfig::from_lookup`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Returns the pool checkout timeout.
    #[must_use]
    pub const fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout_secs)
    }

    /// Builds the Diesel connection pool used by the `PostgreSQL` adapter.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Pool`] when no connection can be established
    /// within the timeout.
    pub fn build_pool(&self) -> Result<BoardPgPool, ConfigError> {
        let manager = ConnectionManager::<PgConnection>::new(&self.database_url);
        Pool::builder()
            .max_size(self.max_connections)
            .connection_timeout(self.connection_timeout())
            .build(manager)
            .map_err(ConfigError::Pool)
    }

    fn validated(self) -> Result<Self, ConfigError> {
        if self.max_connections == 0 {
            return Err(ConfigError::Invalid {
                name: MAX_CONNECTIONS_VAR,
                value: self.max_connections.to_string(),
            });
        }
        if self.connection_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                name: CONNECT_TIMEOUT_VAR,
                value: self.connection_timeout_secs.to_string(),
            });
        }
        Ok(self)
    }
}

fn parse_setting<F, T>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(name)
        .map(|value| {
            value.trim().parse::<T>().map_err(|_| ConfigError::Invalid {
                name,
                value: value.clone(),
            })
        })
        .transpose()
}
