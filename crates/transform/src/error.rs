//! Transform error types
//!
//! Errors raised while building transforms. Runtime write failures use
//! `flow_protocol::StepError`.

use thiserror::Error;

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;

/// Errors that can occur while constructing a transform
#[derive(Debug, Error)]
pub enum TransformError {
    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl TransformError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
