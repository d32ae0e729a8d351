//! Application configuration loaded from environment variables.

use std::time::Duration;

const DEFAULT_DATABASE_URL: &str = "postgres://postgres@localhost:5432/library_rating_system";

/// Database and runtime configuration with sensible defaults.
///
/// Reads from environment variables (a `.env` file is loaded first if present):
/// - `DATABASE_URL`: PostgreSQL connection string
///   (default: `"postgres://postgres@localhost:5432/library_rating_system"`)
/// - `LIBRARY_MAX_CONNECTIONS`: pool size (default: `5`)
/// - `LIBRARY_ACQUIRE_TIMEOUT_SECS`: pool acquire timeout (default: `5`)
/// - `LIBRARY_SEED_COUNT`: rows per table generated for an empty database (default: `1000`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `LIBRARY_LOG_JSON`: emit logs as JSON lines when `true` or `1` (default: `false`)
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub seed_count: usize,
    pub log_level: String,
    pub log_json: bool,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            max_connections: lookup("LIBRARY_MAX_CONNECTIONS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_connections),
            acquire_timeout: lookup("LIBRARY_ACQUIRE_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.acquire_timeout),
            seed_count: lookup("LIBRARY_SEED_COUNT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.seed_count),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            log_json: lookup("LIBRARY_LOG_JSON")
                .map(|v| matches!(v.as_str(), "1" | "true"))
                .unwrap_or(defaults.log_json),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(5),
            seed_count: 1000,
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}
