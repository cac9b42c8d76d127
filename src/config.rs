//! Configuration with layered resolution using figment.
//!
//! Resolution order (highest priority last):
//! 1. User config: `~/.config/spalce/config.toml` (XDG) or platform config dir
//! 2. Project config: `.spalce.toml`
//! 3. Explicit file passed with `--config`, if any
//! 4. Environment variables: `SPALCE_*` (e.g. `SPALCE_MONGO_HOST`)
//!
//! # Example
//!
//! ```toml
//! [service]
//! name = "catalog"
//!
//! [mongo]
//! host = "db.internal"
//! port = 27017
//!
//! [batch]
//! concurrency = 16
//! ```
//!
//! The service name doubles as the database name, so every collection a
//! service owns lives in one database.

use std::ops::Deref;
use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;

use crate::repositories::DEFAULT_BATCH_CONCURRENCY;

/// Boxed wrapper for figment::Error to reduce Result size on the stack.
#[derive(Debug)]
pub struct ConfigError(Box<figment::Error>);

impl Deref for ConfigError {
    type Target = figment::Error;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self(Box::new(err))
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    #[serde(default)]
    pub mongo: MongoConfig,
    #[serde(default)]
    pub batch: BatchConfig,
}

/// Identity of the service owning the data.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Service name (required); selects the database.
    pub name: String,
}

/// MongoDB server location.
#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Batch operation tuning.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchConfig {
    /// Replacements `update_many` keeps in flight.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    27017
}

fn default_concurrency() -> usize {
    DEFAULT_BATCH_CONCURRENCY
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

impl MongoConfig {
    /// Returns the connection string: `mongodb://<host>:<port>`.
    pub fn connection_string(&self) -> String {
        format!("mongodb://{}:{}", self.host, self.port)
    }
}

impl Config {
    /// Load config with layered resolution (user → project → env).
    pub fn load() -> Result<Self, ConfigError> {
        Self::extract(Self::figment(None))
    }

    /// Like [`load`](Config::load), with `path` layered above the project config.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::extract(Self::figment(Some(path)))
    }

    fn figment(explicit: Option<&Path>) -> Figment {
        // Layer 1: User config (lowest priority)
        let mut figment = Figment::new()
            .merge(Toml::file(Self::user_config_path()))
            // Layer 2: Project config
            .merge(Toml::file(".spalce.toml"));

        // Layer 3: Explicit file
        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }

        // Layer 4: Environment variables (highest priority)
        figment.merge(Env::prefixed("SPALCE_").split("_"))
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        figment.extract().map_err(ConfigError::from)
    }

    /// User config path: ~/.config/spalce/config.toml (XDG) or platform config dir.
    fn user_config_path() -> PathBuf {
        // Prefer XDG config location (~/.config) on all platforms
        if let Some(home) = dirs::home_dir() {
            let xdg_path = home.join(".config").join("spalce").join("config.toml");
            if xdg_path.exists() {
                return xdg_path;
            }
        }
        // Fall back to platform-specific config dir
        dirs::config_dir()
            .map(|p| p.join("spalce").join("config.toml"))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn from_toml(contents: &str) -> Result<Config, ConfigError> {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        Config::extract(Figment::new().merge(Toml::file(file.path())))
    }

    #[test]
    fn test_full_config() {
        let config = from_toml(
            r#"
            [service]
            name = "catalog"

            [mongo]
            host = "db.internal"
            port = 27018

            [batch]
            concurrency = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.service.name, "catalog");
        assert_eq!(config.mongo.connection_string(), "mongodb://db.internal:27018");
        assert_eq!(config.batch.concurrency, 3);
    }

    #[test]
    fn test_defaults() {
        let config = from_toml("[service]\nname = \"orders\"\n").unwrap();

        assert_eq!(config.mongo.connection_string(), "mongodb://localhost:27017");
        assert_eq!(config.batch.concurrency, DEFAULT_BATCH_CONCURRENCY);
    }

    #[test]
    fn test_service_name_is_required() {
        let err = from_toml("[mongo]\nhost = \"db\"\n").unwrap_err();
        assert!(err.to_string().contains("name") || err.to_string().contains("service"));
    }

    #[test]
    fn test_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(".spalce.toml", "[service]\nname = \"orders\"\n")?;
            jail.set_env("SPALCE_MONGO_PORT", "27999");

            let config = Config::extract(
                Figment::new()
                    .merge(Toml::file(".spalce.toml"))
                    .merge(Env::prefixed("SPALCE_").split("_")),
            )
            .map_err(|e| e.to_string())?;

            assert_eq!(config.service.name, "orders");
            assert_eq!(config.mongo.port, 27999);
            Ok(())
        });
    }
}
