//! Common types shared by all sources

use std::sync::atomic::{AtomicU64, Ordering};

use flow_protocol::StepError;
use thiserror::Error;

/// Source errors
#[derive(Debug, Error)]
pub enum SourceError {
    /// Forwarding polled facts downstream failed
    #[error("failed to forward facts for topic '{topic}': {source}")]
    Forward {
        /// Topic of the failed write
        topic: String,
        /// Underlying step error
        #[source]
        source: StepError,
    },
}

/// Metrics shared by all source types
#[derive(Debug, Default)]
pub struct SourceMetrics {
    /// Total run invocations
    pub runs: AtomicU64,

    /// Total facts forwarded downstream
    pub facts_forwarded: AtomicU64,

    /// Total errors encountered
    pub errors: AtomicU64,
}

impl SourceMetrics {
    /// Create new metrics instance
    pub const fn new() -> Self {
        Self {
            runs: AtomicU64::new(0),
            facts_forwarded: AtomicU64::new(0),
            errors: AtomicU64::new(0),
        }
    }

    /// Record a run invocation
    #[inline]
    pub fn run(&self) {
        self.runs.fetch_add(1, Ordering::Relaxed);
    }

    /// Record facts forwarded downstream
    #[inline]
    pub fn forwarded(&self, count: u64) {
        self.facts_forwarded.fetch_add(count, Ordering::Relaxed);
    }

    /// Record an error
    #[inline]
    pub fn error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            runs: self.runs.load(Ordering::Relaxed),
            facts_forwarded: self.facts_forwarded.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of source metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub runs: u64,
    pub facts_forwarded: u64,
    pub errors: u64,
}
