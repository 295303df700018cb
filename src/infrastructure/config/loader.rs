use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Project-local directory holding the database and config files.
pub const PROJECT_DIR: &str = ".rapport";
/// Prefix for environment overrides, e.g. `RAPPORT_GUIDED_MODE__MAX_TURNS=5`.
pub const ENV_PREFIX: &str = "RAPPORT_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),

    #[error("Database path cannot be empty")]
    EmptyDatabasePath,

    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    #[error("Invalid max_turns: {0}. Must be at least 1")]
    InvalidMaxTurns(u32),

    #[error("Invalid confidence_floor: {0}. Must be between 0.0 and 1.0")]
    InvalidConfidenceFloor(f64),

    #[error("Invalid embeddings provider: {0}. Must be one of: none, openai")]
    InvalidEmbeddingProvider(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .rapport/config.yaml (project config, created by init)
    /// 3. .rapport/local.yaml (local overrides, optional)
    /// 4. Environment variables (RAPPORT_* prefix, `__` separates nested keys)
    pub fn load() -> Result<Config> {
        Self::load_from_dir(PROJECT_DIR)
    }

    /// Same as [`ConfigLoader::load`] but rooted at `dir` instead of `.rapport/`.
    pub fn load_from_dir(dir: impl AsRef<Path>) -> Result<Config> {
        let dir = dir.as_ref();
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(dir.join("config.yaml")))
            .merge(Yaml::file(dir.join("local.yaml")))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!("Failed to load config from {}", path.as_ref().display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.database.path.is_empty() {
            return Err(ConfigError::EmptyDatabasePath);
        }
        if config.database.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections(config.database.max_connections));
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

        if config.guided_mode.max_turns == 0 {
            return Err(ConfigError::InvalidMaxTurns(0));
        }

        let floor = config.context.confidence_floor;
        if !(0.0..=1.0).contains(&floor) {
            return Err(ConfigError::InvalidConfidenceFloor(floor));
        }
        if config.context.history_messages == 0 {
            return Err(ConfigError::ValidationFailed(
                "context.history_messages must be at least 1".to_string(),
            ));
        }

        match config.embeddings.provider.as_str() {
            "none" => {}
            "openai" => {
                if config.embeddings.dimension == 0 {
                    return Err(ConfigError::ValidationFailed(
                        "embeddings.dimension must be at least 1".to_string(),
                    ));
                }
            }
            other => return Err(ConfigError::InvalidEmbeddingProvider(other.to_string())),
        }

        Ok(())
    }
}
