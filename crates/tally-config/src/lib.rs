//! Tally Configuration System
//!
//! Resolves how a test run behaves: verbosity, strict error handling,
//! re-throwing of unexpected errors, colored output, the severity mask used
//! by strict mode and optional code coverage output.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded and merged in the following order (later overrides earlier):
//! 1. Built-in defaults
//! 2. Project config (./tally.toml, searched upwards from the start directory)
//! 3. Environment variables (TALLY_*, NO_COLOR)
//! 4. Command-line flags (`--verbose`, `-v`, ...)
//!
//! # Example
//!
//! ```no_run
//! use tally_config::ConfigLoader;
//! use std::path::Path;
//!
//! let mut loader = ConfigLoader::new();
//! let mut config = loader.load_from_directory(Path::new(".")).unwrap();
//! config.apply_flags(&std::env::args().collect::<Vec<_>>());
//!
//! if config.verbose() {
//!     println!("verbose output enabled");
//! }
//! ```

pub mod flags;
pub mod loader;
pub mod project;

use std::path::PathBuf;
use thiserror::Error;

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

pub use flags::enabled;
pub use loader::{Config, ConfigLoader, CONFIG_FILE_NAME};
pub use project::{CoverageSection, ProjectConfig, RunSection, SEVERITY_NAMES};
