//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `buttonhub.toml` in the working directory, or at the path in
//! `BUTTONHUB_CONFIG`. Every field has a sensible default so the file is
//! optional. Environment variables take precedence over file values.

use std::ops::RangeInclusive;
use std::time::Duration;

use serde::Deserialize;

use buttonhub_app::platform::PlatformConfig;

const DEFAULT_PATH: &str = "buttonhub.toml";
const PORT_RANGE: RangeInclusive<u16> = 1025..=65535;

/// Top-level configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Display name of the platform.
    pub name: String,
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port of the event listener.
    pub port: u16,
    /// Button names, one accessory and one route each.
    pub buttons: Vec<String>,
    /// Give up on startup if new accessories take longer than this.
    pub init_timeout_secs: Option<u64>,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from the config file (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("BUTTONHUB_CONFIG").unwrap_or_else(|_| DEFAULT_PATH.to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("BUTTONHUB_HOST") {
            self.host = val;
        }
        if let Some(val) = lookup("BUTTONHUB_PORT") {
            self.port = val.parse().map_err(|_| {
                ConfigError::Validation(format!("BUTTONHUB_PORT {val:?} is not a port number"))
            })?;
        }
        if let Some(val) = lookup("BUTTONHUB_DATABASE_URL") {
            self.database.url = val;
        }
        if let Some(val) = lookup("BUTTONHUB_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = lookup("RUST_LOG") {
            self.logging.filter = val;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !PORT_RANGE.contains(&self.port) {
            return Err(ConfigError::Validation(format!(
                "port {} is outside {}..={}",
                self.port,
                PORT_RANGE.start(),
                PORT_RANGE.end()
            )));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The subset of settings the platform startup protocol needs.
    #[must_use]
    pub fn platform(&self) -> PlatformConfig {
        PlatformConfig {
            name: self.name.clone(),
            buttons: self.buttons.clone(),
            init_timeout: self.init_timeout_secs.map(Duration::from_secs),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: "Buttons".to_string(),
            host: "0.0.0.0".to_string(),
            port: 3001,
            buttons: Vec::new(),
            init_timeout_secs: None,
            database: DatabaseConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:buttonhub.db?mode=rwc".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "buttonhubd=info,buttonhub=info,tower_http=debug".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
