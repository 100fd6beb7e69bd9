//! Typed runtime configuration.
//!
//! Sources, later ones winning: built-in defaults, an optional
//! `rusty-forum.toml` in the working directory, then `RUSTY_FORUM__*`
//! environment variables (`RUSTY_FORUM__SERVER__PORT=9000`).

use config::{Config, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub address: String,
    pub port: u16,
    /// Zero means one worker per physical core.
    pub workers: usize,
    /// Seconds granted to in-flight requests on shutdown.
    pub shutdown_timeout: u64,
    pub request_timeout_ms: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".into(),
            port: 5000,
            workers: 0,
            shutdown_timeout: 30,
            request_timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: "sqlite:rusty_forum.db".into(),
            max_connections: 8,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default `env_logger` filter; `RUST_LOG` still takes precedence.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self { level: "info".into() }
    }
}

impl Settings {
    pub fn load() -> Result<Self, config::ConfigError> {
        Config::builder()
            .add_source(File::with_name("rusty-forum").required(false))
            .add_source(
                Environment::with_prefix("RUSTY_FORUM")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let settings: Settings = Config::builder()
            .set_override("server.port", 9000)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.address, "127.0.0.1");
        assert_eq!(settings.database.max_connections, 8);
        assert_eq!(settings.logging.level, "info");
    }
}
