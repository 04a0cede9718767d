//! Engine configuration.
//!
//! Loaded via the `config` crate from `SWITCHYARD_`-prefixed environment
//! variables, with `__` separating nested keys, for example
//! `SWITCHYARD_DATABASE__URL` or `SWITCHYARD_RECOMMENDATION__HISTORY_DEPTH`.

use diesel::{
    PgConnection,
    r2d2::{ConnectionManager, Pool, PoolError},
};
use serde::Deserialize;
use thiserror::Error;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "SWITCHYARD";

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    /// PostgreSQL settings; absent when running on in-memory adapters.
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// Suggestion settings.
    #[serde(default)]
    pub recommendation: RecommendationConfig,

    /// Logging settings.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// PostgreSQL connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatabaseConfig {
    /// Connection URL.
    pub url: String,

    /// Upper bound on pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

/// Suggestion settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RecommendationConfig {
    /// How many recent moves the scorer sees per task.
    #[serde(default = "default_history_depth")]
    pub history_depth: usize,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TelemetryConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is
    /// unset.
    #[serde(default = "default_filter")]
    pub filter: String,
}

/// Connection pool shared by the PostgreSQL adapters.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Errors raised while opening a connection pool.
#[derive(Debug, Error)]
pub enum DatabaseConfigError {
    /// `max_connections` was zero.
    #[error("max_connections must be at least 1")]
    ZeroPoolSize,

    /// The pool could not establish its connections.
    #[error(transparent)]
    Pool(#[from] PoolError),
}

impl DatabaseConfig {
    /// Creates settings for `url` with the default pool size.
    #[must_use]
    pub const fn new(url: String) -> Self {
        Self {
            url,
            max_connections: default_max_connections(),
        }
    }

    /// Overrides the pool size.
    #[must_use]
    pub const fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Opens a connection pool sized by `max_connections`.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseConfigError::ZeroPoolSize`] when the pool would hold
    /// no connections, or [`DatabaseConfigError::Pool`] when the database
    /// cannot be reached.
    pub fn build_pool(&self) -> Result<PgPool, DatabaseConfigError> {
        if self.max_connections == 0 {
            return Err(DatabaseConfigError::ZeroPoolSize);
        }
        let manager = ConnectionManager::<PgConnection>::new(self.url.as_str());
        let pool = Pool::builder()
            .max_size(self.max_connections)
            .build(manager)?;
        tracing::debug!(
            max_connections = self.max_connections,
            "opened postgres connection pool"
        );
        Ok(pool)
    }
}

const fn default_max_connections() -> u32 {
    8
}

const fn default_history_depth() -> usize {
    5
}

fn default_filter() -> String {
    "info".to_owned()
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            history_depth: default_history_depth(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

impl EngineConfig {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
    }

    /// Loads configuration from an explicit environment source.
    ///
    /// # Errors
    ///
    /// Returns an error if a value is present but cannot be parsed.
    pub fn from_source(source: config::Environment) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()
    }
}
