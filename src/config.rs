//! # Configuration
//!
//! Settings are merged from, in increasing precedence:
//!
//! 1. Built-in defaults ([`LedgerConfig::default`])
//! 2. `stock-ledger.toml` in the project directory
//! 3. Environment variables prefixed `STOCK_LEDGER_` (`STOCK_LEDGER_STOCK_WRITES=atomic`)
//!
//! ```toml
//! # stock-ledger.toml
//! stock_writes = "atomic"
//! channel_capacity = 64
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up in the project directory.
pub const CONFIG_FILE: &str = "stock-ledger.toml";

/// How the engine writes stock levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockWriteMode {
    /// Read the product, compute the new level, overwrite it.
    ///
    /// Two operations on the same product can read the same level; the later write wins.
    #[default]
    Overwrite,
    /// Send relative adjustments that the product collection applies to its current value.
    Atomic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub stock_writes: StockWriteMode,
    /// Request buffer of each collection. Must be at least 1.
    pub channel_capacity: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            stock_writes: StockWriteMode::Overwrite,
            channel_capacity: 32,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to merge configuration: {0}")]
    Merge(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(e: config::ConfigError) -> Self {
        ConfigError::Merge(e.to_string())
    }
}

/// Configuration loader with builder pattern.
pub struct ConfigLoader {
    project_dir: PathBuf,
    env_prefix: String,
}

impl ConfigLoader {
    /// Loader rooted at the current directory.
    pub fn new() -> Self {
        Self {
            project_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            env_prefix: "STOCK_LEDGER".to_string(),
        }
    }

    pub fn with_project_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.project_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the environment variable prefix (default: "STOCK_LEDGER")
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load configuration from all sources with proper precedence.
    pub fn load(self) -> Result<LedgerConfig, ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::Config::try_from(&LedgerConfig::default())?);

        let project_file = self.project_dir.join(CONFIG_FILE);
        if project_file.exists() {
            builder = builder.add_source(
                config::File::from(project_file)
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Field names contain '_', so nesting uses "__"
        builder = builder.add_source(
            config::Environment::with_prefix(&self.env_prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let ledger_config: LedgerConfig = builder.build()?.try_deserialize()?;
        ledger_config.validate()?;
        Ok(ledger_config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channel_capacity == 0 {
            return Err(ConfigError::Invalid(
                "channel_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    // A prefix no environment sets, so only defaults and files are seen
    fn loader(dir: &Path) -> ConfigLoader {
        ConfigLoader::new()
            .with_project_dir(dir)
            .with_env_prefix("STOCK_LEDGER_TEST_UNSET")
    }

    #[test]
    fn test_load_defaults() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config = loader(temp_dir.path()).load().expect("Failed to load config");

        assert_eq!(config, LedgerConfig::default());
        assert_eq!(config.stock_writes, StockWriteMode::Overwrite);
        assert_eq!(config.channel_capacity, 32);
    }

    #[test]
    fn test_project_file_overrides_defaults() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        fs::write(
            temp_dir.path().join(CONFIG_FILE),
            "stock_writes = \"atomic\"\nchannel_capacity = 8\n",
        )
        .expect("Failed to write config");

        let config = loader(temp_dir.path()).load().expect("Failed to load config");

        assert_eq!(config.stock_writes, StockWriteMode::Atomic);
        assert_eq!(config.channel_capacity, 8);
    }

    #[test]
    fn test_partial_file_keeps_remaining_defaults() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        fs::write(temp_dir.path().join(CONFIG_FILE), "channel_capacity = 4\n")
            .expect("Failed to write config");

        let config = loader(temp_dir.path()).load().expect("Failed to load config");

        assert_eq!(config.stock_writes, StockWriteMode::Overwrite);
        assert_eq!(config.channel_capacity, 4);
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        fs::write(temp_dir.path().join(CONFIG_FILE), "channel_capacity = 0\n")
            .expect("Failed to write config");

        let result = loader(temp_dir.path()).load();
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_unknown_mode_is_a_merge_error() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        fs::write(temp_dir.path().join(CONFIG_FILE), "stock_writes = \"optimistic\"\n")
            .expect("Failed to write config");

        let result = loader(temp_dir.path()).load();
        assert!(matches!(result, Err(ConfigError::Merge(_))));
    }
}
