//! Flow Configuration
//!
//! TOML-based configuration loading with sensible defaults.
//! Minimal config should just work - only specify what you need to change.
//!
//! # Parsing
//!
//! Use the `FromStr` trait to parse configuration:
//!
//! ```
//! use flow_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str("[batch]\nmax_size = 100").unwrap();
//! assert_eq!(config.batch.max_size, 100);
//! ```
//!
//! # Example Full Config
//!
//! ```toml
//! [batch]
//! max_size = 500
//! flush_interval = "5s"
//!
//! [scheduler]
//! heartbeat_interval = "1s"
//! error_backoff = "1s"
//!
//! [log]
//! level = "info"
//! format = "console"
//! ```

mod batch;
mod error;
mod logging;
mod scheduler;
mod validation;

use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use batch::BatchConfig;
pub use error::{ConfigError, Result};
pub use logging::{LogConfig, LogFormat, LogLevel, LogOutput, init_logging};
pub use scheduler::SchedulerConfig;

use serde::Deserialize;

/// Main configuration structure
///
/// All sections are optional with sensible defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Batching thresholds
    pub batch: BatchConfig,

    /// Heartbeat and run-loop scheduling
    pub scheduler: SchedulerConfig,

    /// Logging configuration
    pub log: LogConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read, contains invalid TOML, or fails
    /// validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    fn parse(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
