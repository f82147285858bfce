use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid workers: {0}. Must be between 1 and 64")]
    InvalidWorkers(usize),

    #[error("Invalid queue capacity: {0}. Must be at least 1")]
    InvalidCapacity(usize),

    #[error("Invalid test timeout: {0}. Must be at least 1 second")]
    InvalidTestTimeout(u64),

    #[error("Sampler command cannot be empty")]
    EmptySamplerCommand,

    #[error("Test command cannot be empty")]
    EmptyTestCommand,

    #[error("Emissions log path cannot be empty")]
    EmptyLogPath,
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. carbonwatch.yaml in the working directory
    /// 3. Environment variables (CARBONWATCH_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file("carbonwatch.yaml"))
            .merge(Env::prefixed("CARBONWATCH_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed("CARBONWATCH_").split("__"))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        if config.queue.workers == 0 || config.queue.workers > 64 {
            return Err(ConfigError::InvalidWorkers(config.queue.workers));
        }

        if config.queue.capacity == 0 {
            return Err(ConfigError::InvalidCapacity(config.queue.capacity));
        }

        if config.measurement.test_timeout_secs == 0 {
            return Err(ConfigError::InvalidTestTimeout(
                config.measurement.test_timeout_secs,
            ));
        }

        if config.measurement.sampler_command.is_empty() {
            return Err(ConfigError::EmptySamplerCommand);
        }

        if config.measurement.test_command.is_empty() {
            return Err(ConfigError::EmptyTestCommand);
        }

        if config.emissions_log.path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyLogPath);
        }

        Ok(())
    }
}
