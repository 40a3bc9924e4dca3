//! Scheduler configuration
//!
//! Controls how often stages are ticked and how failing sources are retried.

use serde::Deserialize;
use std::time::Duration;

/// Scheduler configuration
///
/// # Example
///
/// ```toml
/// [scheduler]
/// heartbeat_interval = "1s"
/// error_backoff = "1s"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Delay between heartbeats of each runnable
    /// Default: 1s
    #[serde(with = "humantime_serde")]
    pub heartbeat_interval: Duration,

    /// Delay before re-running a runnable whose last run failed
    /// Default: 1s
    #[serde(with = "humantime_serde")]
    pub error_backoff: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval: Duration::from_secs(1),
            error_backoff: Duration::from_secs(1),
        }
    }
}
