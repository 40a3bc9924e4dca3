//! Batch transform configuration

use flow_config::BatchConfig;
use std::time::Duration;

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

/// Default number of facts buffered before a size-triggered flush
pub const DEFAULT_MAX_SIZE: usize = 500;

/// Default maximum staleness of a buffered fact
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(5);

/// Flush thresholds shared by a batcher (or every batcher of a router)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSettings {
    /// Buffer length that triggers a flush on write
    ///
    /// Default: 500
    pub max_size: usize,

    /// Time since the last successful flush that triggers a flush on heartbeat
    ///
    /// Zero flushes on every heartbeat. Default: 5s
    pub flush_interval: Duration,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            flush_interval: DEFAULT_FLUSH_INTERVAL,
        }
    }
}

impl BatchSettings {
    /// Create settings from explicit values (max size clamped to 1)
    pub fn new(max_size: usize, flush_interval: Duration) -> Self {
        Self {
            max_size: max_size.max(1),
            flush_interval,
        }
    }

    /// Set the size threshold
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size.max(1);
        self
    }

    /// Set the flush interval
    pub fn with_flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = interval;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_size == 0 {
            return Err("max_size must be at least 1".to_string());
        }
        Ok(())
    }
}

impl TryFrom<&BatchConfig> for BatchSettings {
    type Error = String;

    fn try_from(config: &BatchConfig) -> Result<Self, Self::Error> {
        let settings = BatchSettings {
            max_size: config.max_size,
            flush_interval: config.flush_interval,
        };
        settings.validate()?;
        Ok(settings)
    }
}
