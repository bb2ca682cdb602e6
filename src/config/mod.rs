//! Configuration management
//!
//! Settings are layered: compiled defaults, then an optional
//! `soundwave.toml` next to the binary, then `SOUNDWAVE__*`
//! environment variables (e.g. `SOUNDWAVE__SERVER__PORT=8080`).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            database: DatabaseConfig {
                url: "postgres://postgres@localhost/soundwave".to_string(),
                max_connections: 10,
                min_connections: 1,
            },
        }
    }
}

impl Config {
    /// Load configuration from defaults, file and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Config::default())?)
            .add_source(config::File::with_name("soundwave").required(false))
            .add_source(config::Environment::with_prefix("SOUNDWAVE").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}
