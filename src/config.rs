//! Layered service settings.
//!
//! Sources, later ones winning:
//!   - built-in defaults
//!   - optional config file (`TRIVIA_CONFIG`, default `config.{toml,yaml,json,...}`)
//!   - environment, e.g. `TRIVIA__DATABASE__URL=sqlite:trivia.db`
//!
//! A `.env` file in the working directory is loaded before any of them.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, Source};
use secrecy::SecretString;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
}

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    /// Connection string, may carry credentials
    pub url: SecretString,
    pub max_connections: u32,
    pub create_if_missing: bool,
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080_i64)?
        .set_default("database.url", "sqlite:trivia.db")?
        .set_default("database.max_connections", 5_i64)?
        .set_default("database.create_if_missing", true)
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        let file = dotenv::var("TRIVIA_CONFIG").unwrap_or_else(|_| "config".to_owned());
        defaults()?
            .add_source(File::with_name(&file).required(false))
            .add_source(
                Environment::with_prefix("TRIVIA")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }

    /// Defaults overridden by a single source, without touching the process environment.
    pub fn from_source<S>(source: S) -> Result<Self, ConfigError>
    where
        S: Source + Send + Sync + 'static,
    {
        defaults()?.add_source(source).build()?.try_deserialize()
    }
}
