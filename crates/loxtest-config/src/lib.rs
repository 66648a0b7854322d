//! Loxtest Configuration System
//!
//! Provides configuration for the `loxtest` harness:
//! - Harness configuration file (`loxtest.toml`)
//! - Environment variable overrides (`LOXTEST_*`)
//! - Defaults matching a stock clox checkout
//!
//! # Configuration Hierarchy
//!
//! Configuration is merged in the following order (later overrides earlier):
//! 1. Built-in defaults
//! 2. `loxtest.toml`, found by walking up from the working directory
//! 3. Environment variables (LOXTEST_*)
//! 4. CLI flags
//!
//! # Example
//!
//! ```no_run
//! use loxtest_config::ConfigLoader;
//! use std::path::Path;
//!
//! let loader = ConfigLoader::new();
//! let config = loader.load_from_directory(Path::new(".")).unwrap();
//! println!("tests live in {}", config.tests_dir().display());
//! ```

pub mod harness;
pub mod loader;

use std::path::PathBuf;
use thiserror::Error;

/// Name of the harness configuration file
pub const CONFIG_FILE_NAME: &str = "loxtest.toml";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

// Re-export main types
pub use harness::{ExecutableSection, HarnessFile, HarnessSection};
pub use loader::{Config, ConfigLoader};
