//! # PMM Configuration
//!
//! Layered configuration for the PMM quoting tools.
//!
//! ## Sources (later wins)
//!
//! - **Defaults**: 80 significant digits, `info` logging, fixed-decimal output
//! - **Base file**: `config/pmm.toml` or an explicit path
//! - **Environment file**: `environments/<env>.toml` next to the base file
//! - **Environment variables**: `PMM_<SECTION>__<KEY>`
//!
//! ## Usage
//!
//! ```no_run
//! use pmm_config::load_config;
//!
//! let config = load_config(None, Some("production")).unwrap();
//! let digits = config.precision.significant_digits;
//! ```

pub mod settings;

// Re-export commonly used types
pub use settings::{
    load_config, DisplaySettings, LoggingSettings, PmmConfig, PrecisionSettings,
    DEFAULT_CONFIG_PATH, ENV_PREFIX,
};
