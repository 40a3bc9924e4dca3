//! Batching configuration
//!
//! Thresholds shared by every batcher of a pipeline.

use serde::Deserialize;
use std::time::Duration;

/// Batching configuration
///
/// # Example
///
/// ```toml
/// [batch]
/// max_size = 500
/// flush_interval = "5s"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Buffered facts that trigger a flush on write
    /// Default: 500
    pub max_size: usize,

    /// Maximum time between flushes of a non-empty buffer
    /// Default: 5s
    #[serde(with = "humantime_serde")]
    pub flush_interval: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_size: 500,
            flush_interval: Duration::from_secs(5),
        }
    }
}
