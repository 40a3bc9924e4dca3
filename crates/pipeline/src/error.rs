//! Pipeline error types

use thiserror::Error;

/// Pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Invalid scheduler configuration
    #[error("invalid scheduler configuration: {0}")]
    Config(String),
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PipelineError::Config("heartbeat_interval must be positive".into());
        assert_eq!(
            err.to_string(),
            "invalid scheduler configuration: heartbeat_interval must be positive"
        );
    }
}
