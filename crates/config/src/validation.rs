//! Configuration validation

use crate::Config;
use crate::error::{ConfigError, Result};

/// Validate a parsed configuration
///
/// Checks for:
/// - A batch size of at least one fact
/// - A non-zero heartbeat interval (a zero interval would spin)
pub fn validate_config(config: &Config) -> Result<()> {
    if config.batch.max_size == 0 {
        return Err(ConfigError::invalid(
            "batch",
            "max_size",
            "must be at least 1",
        ));
    }

    if config.scheduler.heartbeat_interval.is_zero() {
        return Err(ConfigError::invalid(
            "scheduler",
            "heartbeat_interval",
            "must be greater than 0",
        ));
    }

    Ok(())
}
