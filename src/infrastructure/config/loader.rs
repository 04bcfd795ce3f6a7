use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Project-local configuration directory
pub const CONFIG_DIR: &str = ".strategic-relay";

/// Prefix for environment overrides, e.g. `RELAY_SERVER__PORT`
pub const ENV_PREFIX: &str = "RELAY_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port: {0}. Must be between 1 and 65535")]
    InvalidPort(u16),

    #[error("Invalid webhook path: {0}. Must start with '/' and differ from /health")]
    InvalidPath(String),

    #[error("Invalid max_body_bytes: {0}. Must be at least 1")]
    InvalidBodyLimit(usize),

    #[error("Invalid tracker api_base: {0}")]
    InvalidApiBase(String),

    #[error("Invalid tracker timeout: {0}. Must be at least 1 second")]
    InvalidTimeout(u64),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .strategic-relay/config.yaml (optional)
    /// 3. .strategic-relay/local.yaml (optional)
    /// 4. Environment variables (RELAY_* prefix, `__` for nesting)
    /// 5. GITHUB_TOKEN as an alias for tracker.token
    pub fn load() -> Result<Config> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(Path::new(CONFIG_DIR).join("config.yaml")))
            .merge(Yaml::file(Path::new(CONFIG_DIR).join("local.yaml")));

        Self::extract(Self::with_env(figment))
    }

    /// Load configuration from a specific file, still honouring environment overrides
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path));

        Self::extract(Self::with_env(figment))
            .with_context(|| format!("Failed to load config from {}", path.display()))
    }

    fn with_env(figment: Figment) -> Figment {
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(Env::raw().only(&["GITHUB_TOKEN"]).map(|_| "tracker.token".into()))
    }

    fn extract(figment: Figment) -> Result<Config> {
        let config: Config = figment
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    ///
    /// Tracker credentials are deliberately not checked here; they are
    /// required per request.
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.server.port == 0 {
            return Err(ConfigError::InvalidPort(config.server.port));
        }

        if !config.server.path.starts_with('/') || config.server.path == "/health" {
            return Err(ConfigError::InvalidPath(config.server.path.clone()));
        }

        if config.server.max_body_bytes == 0 {
            return Err(ConfigError::InvalidBodyLimit(config.server.max_body_bytes));
        }

        if reqwest::Url::parse(&config.tracker.api_base).is_err() {
            return Err(ConfigError::InvalidApiBase(config.tracker.api_base.clone()));
        }

        if config.tracker.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(config.tracker.timeout_secs));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidRotation(config.logging.rotation.clone()));
        }

        Ok(())
    }
}
