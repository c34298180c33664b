//! Server Configuration
//!
//! Loaded once at startup from an optional TOML file overlaid with
//! `METEO_*` environment variables (nested keys use `__`, e.g.
//! `METEO_RATE_LIMIT__BURST_SIZE=3`).

use crate::rate_limit::RateLimitConfig;
use data_validator::PlausibilityConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use storage::SqliteStoreConfig;

/// Default config file looked up when none is given
pub const DEFAULT_CONFIG_PATH: &str = "meteo.toml";

/// `database_url` value selecting the non-durable in-memory store
pub const MEMORY_DATABASE: &str = "memory";

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub bind_addr: String,
    /// sqlx SQLite URL, or `memory`
    pub database_url: String,
    /// SQLite pool size
    pub max_connections: u32,
    /// SQLite busy timeout (ms)
    pub busy_timeout_ms: u64,
    /// Max tracing level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
    pub rate_limit: RateLimitConfig,
    pub plausibility: PlausibilityConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            database_url: "sqlite://measurements.db".to_string(),
            max_connections: 4,
            busy_timeout_ms: 5_000,
            log_level: "info".to_string(),
            log_json: false,
            rate_limit: RateLimitConfig::default(),
            plausibility: PlausibilityConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load from `path` (missing file is fine) and the environment
    pub fn load(path: &str) -> Result<Self, ::config::ConfigError> {
        ::config::Config::builder()
            .add_source(::config::File::with_name(path).required(false))
            .add_source(
                ::config::Environment::with_prefix("METEO")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn uses_memory_store(&self) -> bool {
        self.database_url == MEMORY_DATABASE
    }

    pub fn sqlite(&self) -> SqliteStoreConfig {
        SqliteStoreConfig {
            url: self.database_url.clone(),
            max_connections: self.max_connections,
            busy_timeout: Duration::from_millis(self.busy_timeout_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let config = ServerConfig::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.bind_addr, ServerConfig::default().bind_addr);
        assert!(config.rate_limit.enabled);
        assert!(!config.plausibility.enabled);
    }

    #[test]
    fn test_file_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meteo.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
bind_addr = "127.0.0.1:9000"
database_url = "memory"

[rate_limit]
burst_size = 2

[plausibility]
enabled = true
humidity_range = [5.0, 95.0]
"#
        )
        .unwrap();

        let config = ServerConfig::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:9000");
        assert!(config.uses_memory_store());
        assert_eq!(config.rate_limit.burst_size, 2);
        assert_eq!(config.rate_limit.per_second, 1);
        assert!(config.plausibility.enabled);
        assert_eq!(config.plausibility.humidity_range, (5.0, 95.0));
        assert_eq!(config.plausibility.temperature_range, (-60.0, 70.0));
    }

    #[test]
    fn test_sqlite_settings() {
        let config = ServerConfig {
            busy_timeout_ms: 250,
            ..Default::default()
        };
        let sqlite = config.sqlite();
        assert_eq!(sqlite.busy_timeout, Duration::from_millis(250));
        assert_eq!(sqlite.url, "sqlite://measurements.db");
    }
}
