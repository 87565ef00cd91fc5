//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file with an environment variable
//! override for `DATABASE_URL`.

use serde::Deserialize;
use std::path::Path;

use tracing_subscriber::fmt;
use tracing_subscriber::EnvFilter;

use crate::error::{ConfigError, Result};

/// Main application configuration.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub training: TrainingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address the HTTP server binds to.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Maximum accepted upload size in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

/// SQLite database settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path or URL passed to Diesel's SQLite connection manager.
    #[serde(default = "default_database_url")]
    pub url: String,
}

/// Model artifact settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Directory where trained model artifacts and their schema sidecar live.
    #[serde(default = "default_artifact_dir")]
    pub artifact_dir: String,
}

/// Hyperparameters for the training run.
#[derive(Debug, Clone, Deserialize)]
pub struct TrainingConfig {
    /// Boosting rounds for the gradient-boosted backend.
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    /// Maximum tree depth for the gradient-boosted backend.
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
    /// Learning rate for the gradient-boosted backend.
    #[serde(default = "default_shrinkage")]
    pub shrinkage: f64,
    /// Fraction of records held out for evaluation.
    #[serde(default = "default_test_fraction")]
    pub test_fraction: f64,
    /// Seed for the train/test shuffle, fixed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_bind() -> String {
    "127.0.0.1:8080".into()
}

fn default_max_upload_bytes() -> usize {
    20 * 1024 * 1024
}

fn default_database_url() -> String {
    "data/demand.db".into()
}

fn default_artifact_dir() -> String {
    "models".into()
}

fn default_iterations() -> usize {
    100
}

fn default_max_depth() -> u32 {
    5
}

fn default_shrinkage() -> f64 {
    0.1
}

fn default_test_fraction() -> f64 {
    0.2
}

fn default_seed() -> u64 {
    42
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            artifact_dir: default_artifact_dir(),
        }
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            max_depth: default_max_depth(),
            shrinkage: default_shrinkage(),
            test_fraction: default_test_fraction(),
            seed: default_seed(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let mut config: Config = toml::from_str(&content).map_err(ConfigError::Parse)?;

        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.database.url = url;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults when the
    /// file does not exist.
    ///
    /// # Errors
    /// Returns an error if an existing file cannot be parsed or validated.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<()> {
        if self.server.bind.is_empty() {
            return Err(ConfigError::MissingField {
                field: "server.bind",
            }
            .into());
        }
        if self.database.url.is_empty() {
            return Err(ConfigError::MissingField {
                field: "database.url",
            }
            .into());
        }
        if self.training.iterations == 0 {
            return Err(ConfigError::InvalidValue {
                field: "training.iterations",
                reason: "must be at least 1".into(),
            }
            .into());
        }
        if !(self.training.test_fraction > 0.0 && self.training.test_fraction < 1.0) {
            return Err(ConfigError::InvalidValue {
                field: "training.test_fraction",
                reason: format!(
                    "must be strictly between 0 and 1, got {}",
                    self.training.test_fraction
                ),
            }
            .into());
        }
        if self.training.shrinkage <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "training.shrinkage",
                reason: format!("must be positive, got {}", self.training.shrinkage),
            }
            .into());
        }
        Ok(())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.logging.level));

        match self.logging.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn default_config_validates() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.training.seed, 42);
        assert_eq!(config.server.bind, "127.0.0.1:8080");
    }

    #[test]
    fn parses_partial_toml_with_defaults() {
        let config: Config = toml::from_str(
            r#"
[database]
url = "test.db"

[training]
iterations = 10
"#,
        )
        .unwrap();

        assert_eq!(config.database.url, "test.db");
        assert_eq!(config.training.iterations, 10);
        assert_eq!(config.training.max_depth, 5);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn rejects_out_of_range_test_fraction() {
        let mut config = Config::default();
        config.training.test_fraction = 1.5;

        match config.validate() {
            Err(Error::Config(crate::error::ConfigError::InvalidValue {
                field: "training.test_fraction",
                ..
            })) => {}
            other => panic!("expected invalid test_fraction, got {other:?}"),
        }
    }

    #[test]
    fn rejects_zero_iterations() {
        let mut config = Config::default();
        config.training.iterations = 0;
        assert!(config.validate().is_err());
    }
}
