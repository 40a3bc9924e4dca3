//! Logging configuration
//!
//! Controls the internal logging behavior of the pipeline and installs the
//! `tracing` subscriber.

use std::fs::OpenOptions;
use std::sync::Mutex;

use serde::Deserialize;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::error::{ConfigError, Result};

/// Lowest severity the pipeline emits
///
/// Flush and scheduler events log at `debug`, retried flushes and failed runs
/// at `warn`, and task panics at `error`.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Equivalent `tracing` filter
    pub fn filter(self) -> LevelFilter {
        match self {
            Self::Trace => LevelFilter::TRACE,
            Self::Debug => LevelFilter::DEBUG,
            Self::Info => LevelFilter::INFO,
            Self::Warn => LevelFilter::WARN,
            Self::Error => LevelFilter::ERROR,
        }
    }
}

/// Event encoding
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One human-readable line per event
    #[default]
    Console,
    /// One JSON object per event, for log shippers
    Json,
}

/// Where events are written
///
/// Any value other than `stdout` or `stderr` is taken as a file path, opened
/// for append.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Stdout,
    Stderr,
    #[serde(untagged)]
    File(String),
}

/// `[log]` section
///
/// ```toml
/// [log]
/// level = "debug"
/// format = "json"
/// output = "/var/log/flow.log"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    pub output: LogOutput,
}

/// Install the global `tracing` subscriber described by `config`
///
/// `RUST_LOG` overrides the configured level when set. Fails if a subscriber
/// is already installed.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(config.level.filter().into())
        .from_env()
        .map_err(|e| ConfigError::Logging(format!("invalid RUST_LOG: {}", e)))?;

    let layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_writer(make_writer(&config.output)?);

    let registry = tracing_subscriber::registry().with(filter);
    let result = match config.format {
        LogFormat::Console => registry.with(layer).try_init(),
        LogFormat::Json => registry.with(layer.json()).try_init(),
    };

    result.map_err(|e| ConfigError::Logging(e.to_string()))
}

/// Build the writer for a log destination, creating the file if needed
fn make_writer(output: &LogOutput) -> Result<BoxMakeWriter> {
    let writer = match output {
        LogOutput::Stdout => BoxMakeWriter::new(std::io::stdout),
        LogOutput::Stderr => BoxMakeWriter::new(std::io::stderr),
        LogOutput::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| ConfigError::IoError {
                    path: path.clone(),
                    source: e,
                })?;
            BoxMakeWriter::new(Mutex::new(file))
        }
    };
    Ok(writer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.level, LogLevel::Info);
        assert_eq!(config.format, LogFormat::Console);
        assert_eq!(config.output, LogOutput::Stdout);
    }

    #[test]
    fn test_deserialize_empty() {
        let config: LogConfig = toml::from_str("").unwrap();
        assert_eq!(config.level, LogLevel::Info);
        assert_eq!(config.format, LogFormat::Console);
    }

    #[test]
    fn test_deserialize_full() {
        let toml = r#"
level = "debug"
format = "json"
output = "stderr"
"#;
        let config: LogConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.output, LogOutput::Stderr);
    }

    #[test]
    fn test_deserialize_all_levels() {
        for (s, expected) in [
            ("trace", LogLevel::Trace),
            ("debug", LogLevel::Debug),
            ("info", LogLevel::Info),
            ("warn", LogLevel::Warn),
            ("error", LogLevel::Error),
        ] {
            let toml = format!("level = \"{}\"", s);
            let config: LogConfig = toml::from_str(&toml).unwrap();
            assert_eq!(config.level, expected);
        }
    }

    #[test]
    fn test_level_filter() {
        assert_eq!(LogLevel::Trace.filter(), LevelFilter::TRACE);
        assert_eq!(LogLevel::Info.filter(), LevelFilter::INFO);
        assert_eq!(LogLevel::Error.filter(), LevelFilter::ERROR);
        assert!(LogLevel::Warn.filter() < LogLevel::Debug.filter());
    }

    #[test]
    fn test_deserialize_file_output() {
        let config: LogConfig = toml::from_str("output = \"/var/log/flow.log\"").unwrap();
        assert_eq!(config.output, LogOutput::File("/var/log/flow.log".into()));
    }

    #[test]
    fn test_make_writer_creates_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flow.log");
        let output = LogOutput::File(path.display().to_string());

        assert!(make_writer(&output).is_ok());
        assert!(path.exists());
    }

    #[test]
    fn test_make_writer_bad_path() {
        let output = LogOutput::File("/nonexistent-dir/flow.log".into());
        let err = make_writer(&output).err().unwrap();
        assert!(matches!(err, ConfigError::IoError { .. }));
    }

    #[test]
    fn test_init_logging_only_once() {
        let config = LogConfig::default();
        assert!(init_logging(&config).is_ok());

        let err = init_logging(&config).unwrap_err();
        assert!(matches!(err, ConfigError::Logging(_)));
    }
}
