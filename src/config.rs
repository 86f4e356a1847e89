//! Runtime configuration for trade-forge.
//!
//! Covers where dataset files live, how the HTTP surface binds, how many
//! validation errors are reported back, and the OHLC bar spacing.

use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    /// Configuration validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration shared by the CLI and the HTTP server.
#[derive(Debug, Clone)]
pub struct ForgeConfig {
    /// Directory holding generated `.jsonl` dataset files.
    pub datasets_dir: PathBuf,
    /// Address the HTTP server listens on.
    pub bind_addr: SocketAddr,
    /// Cap on per-line errors returned by file validation.
    pub max_reported_errors: usize,
    /// Spacing between consecutive synthetic OHLC bars.
    pub ohlc_interval_minutes: i64,
    /// Dataset size used when a request does not name one.
    pub default_size: usize,
    /// Largest dataset a single request may generate.
    pub max_dataset_size: usize,
    /// Largest OHLC preview a single request may generate.
    pub max_ohlc_bars: usize,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            datasets_dir: PathBuf::from("./datasets"),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            max_reported_errors: 50,
            ohlc_interval_minutes: 5,
            default_size: 1000,
            max_dataset_size: 100_000,
            max_ohlc_bars: 1000,
        }
    }
}

impl ForgeConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `FORGE_DATASETS_DIR`: Dataset directory (default: ./datasets)
    /// - `FORGE_BIND_ADDR`: HTTP bind address (default: 127.0.0.1:5000)
    /// - `FORGE_MAX_REPORTED_ERRORS`: Validation error cap (default: 50)
    /// - `FORGE_OHLC_INTERVAL_MINUTES`: OHLC bar spacing (default: 5)
    /// - `FORGE_DEFAULT_SIZE`: Default dataset size (default: 1000)
    /// - `FORGE_MAX_DATASET_SIZE`: Dataset size limit (default: 100000)
    /// - `FORGE_MAX_OHLC_BARS`: OHLC preview bar limit (default: 1000)
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("FORGE_DATASETS_DIR") {
            config.datasets_dir = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("FORGE_BIND_ADDR") {
            config.bind_addr = parse_env_value(&val, "FORGE_BIND_ADDR")?;
        }

        if let Ok(val) = std::env::var("FORGE_MAX_REPORTED_ERRORS") {
            config.max_reported_errors = parse_env_value(&val, "FORGE_MAX_REPORTED_ERRORS")?;
        }

        if let Ok(val) = std::env::var("FORGE_OHLC_INTERVAL_MINUTES") {
            config.ohlc_interval_minutes = parse_env_value(&val, "FORGE_OHLC_INTERVAL_MINUTES")?;
        }

        if let Ok(val) = std::env::var("FORGE_DEFAULT_SIZE") {
            config.default_size = parse_env_value(&val, "FORGE_DEFAULT_SIZE")?;
        }

        if let Ok(val) = std::env::var("FORGE_MAX_DATASET_SIZE") {
            config.max_dataset_size = parse_env_value(&val, "FORGE_MAX_DATASET_SIZE")?;
        }

        if let Ok(val) = std::env::var("FORGE_MAX_OHLC_BARS") {
            config.max_ohlc_bars = parse_env_value(&val, "FORGE_MAX_OHLC_BARS")?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.datasets_dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "datasets_dir cannot be empty".to_string(),
            ));
        }

        if self.ohlc_interval_minutes <= 0 {
            return Err(ConfigError::ValidationFailed(
                "ohlc_interval_minutes must be greater than 0".to_string(),
            ));
        }

        if self.default_size == 0 {
            return Err(ConfigError::ValidationFailed(
                "default_size must be greater than 0".to_string(),
            ));
        }

        if self.default_size > self.max_dataset_size {
            return Err(ConfigError::ValidationFailed(format!(
                "default_size {} exceeds max_dataset_size {}",
                self.default_size, self.max_dataset_size
            )));
        }

        if self.max_ohlc_bars == 0 {
            return Err(ConfigError::ValidationFailed(
                "max_ohlc_bars must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Builder method to set the dataset directory.
    pub fn with_datasets_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.datasets_dir = dir.into();
        self
    }

    /// Builder method to set the bind address.
    pub fn with_bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Builder method to set the validation error cap.
    pub fn with_max_reported_errors(mut self, max: usize) -> Self {
        self.max_reported_errors = max;
        self
    }

    /// Builder method to set the dataset size limit.
    pub fn with_max_dataset_size(mut self, max: usize) -> Self {
        self.max_dataset_size = max;
        self
    }

    /// Builder method to set the OHLC preview bar limit.
    pub fn with_max_ohlc_bars(mut self, max: usize) -> Self {
        self.max_ohlc_bars = max;
        self
    }

    /// Builder method to set the OHLC bar spacing.
    pub fn with_ohlc_interval_minutes(mut self, minutes: i64) -> Self {
        self.ohlc_interval_minutes = minutes;
        self
    }
}

/// Parse an environment variable value into a type.
fn parse_env_value<T: std::str::FromStr>(value: &str, key: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("could not parse '{}'", value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ForgeConfig::default();
        assert_eq!(config.datasets_dir, PathBuf::from("./datasets"));
        assert_eq!(config.bind_addr.port(), 5000);
        assert_eq!(config.max_reported_errors, 50);
        assert_eq!(config.ohlc_interval_minutes, 5);
        assert_eq!(config.default_size, 1000);
        assert_eq!(config.max_dataset_size, 100_000);
        assert_eq!(config.max_ohlc_bars, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = ForgeConfig::new()
            .with_datasets_dir("/tmp/out")
            .with_bind_addr(SocketAddr::from(([0, 0, 0, 0], 8080)))
            .with_max_reported_errors(10)
            .with_ohlc_interval_minutes(15);

        assert_eq!(config.datasets_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.max_reported_errors, 10);
        assert_eq!(config.ohlc_interval_minutes, 15);
    }

    #[test]
    fn test_validation_invalid_interval() {
        let config = ForgeConfig::default().with_ohlc_interval_minutes(0);
        let result = config.validate();
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("ohlc_interval_minutes"));
    }

    #[test]
    fn test_validation_limits() {
        let config = ForgeConfig::default().with_max_dataset_size(10);
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("max_dataset_size"));

        let config = ForgeConfig::default().with_max_ohlc_bars(0);
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("max_ohlc_bars"));
    }

    #[test]
    fn test_from_env_validates() {
        std::env::set_var("FORGE_MAX_OHLC_BARS", "0");
        let result = ForgeConfig::from_env();
        std::env::remove_var("FORGE_MAX_OHLC_BARS");

        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ValidationFailed(_)));
        assert!(err.to_string().contains("max_ohlc_bars"));
    }

    #[test]
    fn test_validation_empty_dir() {
        let config = ForgeConfig::default().with_datasets_dir("");
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("datasets_dir"));
    }

    #[test]
    fn test_parse_env_value() {
        let addr: SocketAddr =
            parse_env_value("0.0.0.0:9000", "FORGE_BIND_ADDR").expect("should parse");
        assert_eq!(addr.port(), 9000);

        let bad: Result<usize, _> = parse_env_value("many", "FORGE_MAX_REPORTED_ERRORS");
        let err = bad.unwrap_err().to_string();
        assert!(err.contains("FORGE_MAX_REPORTED_ERRORS"));
        assert!(err.contains("many"));
    }
}
