//! Common types and utilities for sinks
//!
//! Shared functionality across all sink types.

use std::sync::atomic::{AtomicU64, Ordering};

use flow_protocol::StepError;
use thiserror::Error;

use crate::table::StoreError;

/// Metrics shared by all sink types
#[derive(Debug, Default)]
pub struct SinkMetrics {
    /// Total writes received
    pub writes_received: AtomicU64,

    /// Total writes successfully persisted
    pub writes_completed: AtomicU64,

    /// Total facts persisted
    pub facts_written: AtomicU64,

    /// Write errors encountered
    pub write_errors: AtomicU64,
}

impl SinkMetrics {
    /// Create new metrics instance
    pub const fn new() -> Self {
        Self {
            writes_received: AtomicU64::new(0),
            writes_completed: AtomicU64::new(0),
            facts_written: AtomicU64::new(0),
            write_errors: AtomicU64::new(0),
        }
    }

    /// Record a received write
    #[inline]
    pub fn write_received(&self) {
        self.writes_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a completed write
    #[inline]
    pub fn write_completed(&self, fact_count: u64) {
        self.writes_completed.fetch_add(1, Ordering::Relaxed);
        self.facts_written.fetch_add(fact_count, Ordering::Relaxed);
    }

    /// Record a write error
    #[inline]
    pub fn write_error(&self) {
        self.write_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            writes_received: self.writes_received.load(Ordering::Relaxed),
            writes_completed: self.writes_completed.load(Ordering::Relaxed),
            facts_written: self.facts_written.load(Ordering::Relaxed),
            write_errors: self.write_errors.load(Ordering::Relaxed),
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.writes_received.store(0, Ordering::Relaxed);
        self.writes_completed.store(0, Ordering::Relaxed);
        self.facts_written.store(0, Ordering::Relaxed);
        self.write_errors.store(0, Ordering::Relaxed);
    }
}

/// Point-in-time snapshot of sink metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub writes_received: u64,
    pub writes_completed: u64,
    pub facts_written: u64,
    pub write_errors: u64,
}

/// Common sink errors
#[derive(Debug, Error)]
pub enum SinkError {
    /// Table store rejected the write
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SinkError {
    /// Convert into the step error reported to upstream stages
    pub fn into_step(self, stage: &'static str) -> StepError {
        StepError::downstream(stage, self)
    }
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
