//! Step error types
//!
//! Errors surfaced by the write path of a pipeline stage.

use thiserror::Error;

/// Boxed error used where a stage forwards a failure it does not own
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned from `Step::write` and forced flushes
#[derive(Debug, Error)]
pub enum StepError {
    /// The stage was used before its downstream step was connected
    #[error("{stage} has no downstream step")]
    NotConnected {
        /// Name of the stage missing its wiring
        stage: &'static str,
    },

    /// The downstream write failed; buffered data is kept for retry
    #[error("{stage} write failed: {source}")]
    Downstream {
        /// Name of the stage that failed
        stage: &'static str,
        /// Underlying error
        #[source]
        source: BoxError,
    },
}

impl StepError {
    /// Create a not connected error
    #[inline]
    pub fn not_connected(stage: &'static str) -> Self {
        Self::NotConnected { stage }
    }

    /// Wrap an error raised by a downstream stage
    pub fn downstream(stage: &'static str, source: impl Into<BoxError>) -> Self {
        Self::Downstream {
            stage,
            source: source.into(),
        }
    }

    /// Whether this is a wiring error rather than a runtime failure
    #[inline]
    pub fn is_not_connected(&self) -> bool {
        matches!(self, Self::NotConnected { .. })
    }
}
