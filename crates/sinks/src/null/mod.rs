//! Null sink - discards all data
//!
//! Terminates a chain without any I/O. Writes are counted and dropped.
//!
//! # Use Cases
//!
//! - **Benchmarking**: Measure pure pipeline throughput without sink bottlenecks
//! - **Testing**: Validate wiring and batching configuration
//!
//! # Example
//!
//! ```ignore
//! use flow_sinks::null::NullSink;
//!
//! let sink = Arc::new(NullSink::new());
//! batcher.connect(sink.clone());
//!
//! assert_eq!(sink.metrics().snapshot().facts_received, 0);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use flow_protocol::{Fact, Heartbeat, Step, StepError, Topic, async_trait};

/// Null sink that discards all received facts
#[derive(Debug)]
pub struct NullSink {
    /// Sink name for logging
    name: String,

    metrics: NullSinkMetrics,
}

/// Metrics for the null sink
#[derive(Debug, Default)]
pub struct NullSinkMetrics {
    /// Total writes received
    writes_received: AtomicU64,

    /// Total facts received (sum of write lengths)
    facts_received: AtomicU64,

    /// Total heartbeats received
    heartbeats: AtomicU64,
}

impl NullSinkMetrics {
    /// Create new metrics instance
    #[inline]
    pub const fn new() -> Self {
        Self {
            writes_received: AtomicU64::new(0),
            facts_received: AtomicU64::new(0),
            heartbeats: AtomicU64::new(0),
        }
    }

    /// Record a received write
    #[inline]
    pub fn record_write(&self, fact_count: u64) {
        self.writes_received.fetch_add(1, Ordering::Relaxed);
        self.facts_received.fetch_add(fact_count, Ordering::Relaxed);
    }

    /// Record a heartbeat
    #[inline]
    pub fn record_heartbeat(&self) {
        self.heartbeats.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            writes_received: self.writes_received.load(Ordering::Relaxed),
            facts_received: self.facts_received.load(Ordering::Relaxed),
            heartbeats: self.heartbeats.load(Ordering::Relaxed),
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.writes_received.store(0, Ordering::Relaxed);
        self.facts_received.store(0, Ordering::Relaxed);
        self.heartbeats.store(0, Ordering::Relaxed);
    }
}

/// Point-in-time snapshot of null sink metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub writes_received: u64,
    pub facts_received: u64,
    pub heartbeats: u64,
}

impl NullSink {
    /// Create a new null sink
    pub fn new() -> Self {
        Self::with_name("null")
    }

    /// Create a new null sink with a custom name
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metrics: NullSinkMetrics::new(),
        }
    }

    /// Get reference to metrics
    #[inline]
    pub fn metrics(&self) -> &NullSinkMetrics {
        &self.metrics
    }

    /// Get the sink name
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Default for NullSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Heartbeat for NullSink {
    async fn heartbeat(&self) {
        self.metrics.record_heartbeat();
    }
}

#[async_trait]
impl Step for NullSink {
    async fn write(&self, topic: &Topic, facts: &[Fact]) -> Result<(), StepError> {
        tracing::trace!(sink = %self.name, %topic, count = facts.len(), "discarding facts");
        self.metrics.record_write(facts.len() as u64);
        Ok(())
    }
}

#[cfg(test)]
#[path = "null_test.rs"]
mod null_test;
