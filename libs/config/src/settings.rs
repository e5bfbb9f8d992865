//! PMM Configuration Module
//!
//! Provides configuration loading for PMM quoting tools.
//! Supports loading from TOML files with environment-specific overrides.

use anyhow::{bail, Context, Result};
use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Default configuration file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config/pmm.toml";

/// Prefix of environment variable overrides (`PMM_PRECISION__SIGNIFICANT_DIGITS=100`)
pub const ENV_PREFIX: &str = "PMM";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Main configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct PmmConfig {
    /// Decimal substrate settings
    pub precision: PrecisionSettings,

    /// Log output settings
    pub logging: LoggingSettings,

    /// Quote rendering settings
    pub display: DisplaySettings,
}

/// Decimal precision settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct PrecisionSettings {
    /// Significant digits kept by division and square root
    pub significant_digits: u64,
    /// Decimal exponent at which output switches to scientific notation
    pub exponential_at: i64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct DisplaySettings {
    /// Render amounts with the receiving token's decimal count
    pub fixed_output: bool,
}

impl Default for PrecisionSettings {
    fn default() -> Self {
        Self {
            significant_digits: 80,
            exponential_at: 80,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self { fixed_output: true }
    }
}

impl PmmConfig {
    /// Load configuration from files with environment overrides
    ///
    /// An explicit `base_path` must exist; the default path is optional.
    /// Environment files live in an `environments/` directory next to the
    /// base file.
    pub fn load(base_path: Option<&Path>, environment: Option<&str>) -> Result<Self> {
        let (base, required) = match base_path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
        };
        debug!("Loading base config: {:?} (required: {})", base, required);

        let mut builder = Config::builder().add_source(File::from(base.as_path()).required(required));

        // Add environment-specific overrides if specified
        if let Some(env) = environment {
            let env_file = base
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join("environments")
                .join(format!("{}.toml", env));

            if env_file.exists() {
                info!("Loading environment config: {:?}", env_file);
                builder = builder.add_source(File::from(env_file));
            } else {
                warn!("Environment config not found: {:?}", env_file);
            }
        }

        // Override with environment variables (PMM_ prefix)
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: PmmConfig = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the quoting tools cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.precision.significant_digits == 0 {
            bail!("precision.significant_digits must be positive");
        }
        if !LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            bail!(
                "logging.level must be one of {:?}, got {:?}",
                LOG_LEVELS,
                self.logging.level
            );
        }
        Ok(())
    }
}

/// Convenience function to load configuration with defaults
pub fn load_config(path: Option<&Path>, environment: Option<&str>) -> Result<PmmConfig> {
    PmmConfig::load(path, environment)
}
