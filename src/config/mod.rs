//! Configuration loading and management
//!
//! Settings come from an optional YAML file (path in `BIZTIME_CONFIG`) and
//! are then overridden by environment variables:
//!
//! | Variable          | Field                     |
//! |-------------------|---------------------------|
//! | `BIZTIME_HOST`    | `host`                    |
//! | `BIZTIME_PORT`    | `port`                    |
//! | `BIZTIME_BACKEND` | `database.backend`        |
//! | `DATABASE_URL`    | `database.url`            |
//! | `BIZTIME_ENV`     | `test` selects `test_url` |

use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which store implementation serves requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Postgres,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            _ => Err(ConfigError::InvalidValue {
                field: "database.backend".to_string(),
                value: s.to_string(),
                message: "expected 'memory' or 'postgres'".to_string(),
            }),
        }
    }
}

/// Database settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub backend: StorageBackend,

    /// Connection URL used outside tests
    pub url: String,

    /// Connection URL used when `test_mode` is set
    pub test_url: String,

    pub max_connections: u32,

    /// Apply embedded migrations at startup
    pub migrate: bool,

    #[serde(skip)]
    pub test_mode: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            url: "postgresql:///biztime".to_string(),
            test_url: "postgresql:///biztime_test".to_string(),
            max_connections: 5,
            migrate: true,
            test_mode: false,
        }
    }
}

impl DatabaseConfig {
    /// URL for the current environment
    pub fn active_url(&self) -> &str {
        if self.test_mode {
            &self.test_url
        } else {
            &self.url
        }
    }
}

/// Complete server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database: DatabaseConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            database: DatabaseConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.to_string()),
            message: e.to_string(),
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load from `BIZTIME_CONFIG` (or defaults) and apply environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let config = match std::env::var("BIZTIME_CONFIG") {
            Ok(path) => Self::from_yaml_file(&path)?,
            Err(_) => Self::default(),
        };
        config.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("BIZTIME_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("BIZTIME_PORT") {
            self.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                field: "port".to_string(),
                value: port.clone(),
                message: "expected an integer between 0 and 65535".to_string(),
            })?;
        }
        if let Some(backend) = lookup("BIZTIME_BACKEND") {
            self.database.backend = backend.parse()?;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(env) = lookup("BIZTIME_ENV") {
            self.database.test_mode = env.eq_ignore_ascii_case("test");
        }
        Ok(self)
    }

    /// `host:port` to bind the listener to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
