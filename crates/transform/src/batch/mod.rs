//! Batch Transform - Buffer one topic and flush by size or age
//!
//! Accumulates facts for a single topic and writes them downstream in one
//! call when either trigger fires:
//!
//! - **Size**: checked on every write; the buffer reached `max_size`
//! - **Age**: checked on every heartbeat; `flush_interval` elapsed since the
//!   last successful flush
//!
//! Facts for other topics are dropped here; fanning mixed topics out is the
//! job of [`BatchByTopic`](crate::BatchByTopic).
//!
//! # Example
//!
//! ```ignore
//! let batch = Arc::new(BatchTransform::new("orders", 500, Duration::from_secs(5)));
//! batch.connect(sink);
//!
//! batch.write(&Topic::new("orders"), &facts).await?;
//! batch.heartbeat().await; // flushes once 5s have passed
//! batch.flush().await?;    // drain on shutdown
//! ```

mod config;
mod state;

pub use config::{BatchSettings, DEFAULT_FLUSH_INTERVAL, DEFAULT_MAX_SIZE};
pub use state::BatchState;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use flow_protocol::{Fact, Heartbeat, Step, StepError, Topic, Transform, async_trait};
use parking_lot::RwLock;
use tokio::sync::Mutex;

use crate::{TransformError, TransformResult};

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

/// Metrics for a batch transform
#[derive(Debug, Default)]
pub struct BatchMetrics {
    /// Facts accepted into the buffer
    pub facts_buffered: AtomicU64,
    /// Facts discarded because their topic did not match
    pub facts_dropped: AtomicU64,
    /// Facts written downstream by successful flushes
    pub facts_flushed: AtomicU64,
    /// Successful flushes
    pub flushes: AtomicU64,
    /// Flushes whose downstream write failed
    pub flush_errors: AtomicU64,
    /// Due heartbeat flushes skipped because no downstream was connected
    pub flushes_skipped: AtomicU64,
}

impl BatchMetrics {
    /// Get a point-in-time copy of all counters
    pub fn snapshot(&self) -> BatchMetricsSnapshot {
        BatchMetricsSnapshot {
            facts_buffered: self.facts_buffered.load(Ordering::Relaxed),
            facts_dropped: self.facts_dropped.load(Ordering::Relaxed),
            facts_flushed: self.facts_flushed.load(Ordering::Relaxed),
            flushes: self.flushes.load(Ordering::Relaxed),
            flush_errors: self.flush_errors.load(Ordering::Relaxed),
            flushes_skipped: self.flushes_skipped.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of batch metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchMetricsSnapshot {
    pub facts_buffered: u64,
    pub facts_dropped: u64,
    pub facts_flushed: u64,
    pub flushes: u64,
    pub flush_errors: u64,
    pub flushes_skipped: u64,
}

/// Downstream slot; a router and the batchers it creates share one
pub(crate) type Downstream = Arc<RwLock<Option<Arc<dyn Step>>>>;

/// Single-topic batcher
///
/// Writes and heartbeats are serialized by one lock that is held across the
/// downstream write, so flush decisions for a topic never interleave.
pub struct BatchTransform {
    /// The only topic this batcher buffers
    topic: Topic,

    /// Flush thresholds
    settings: BatchSettings,

    /// Buffer and last-flush time
    state: Mutex<BatchState>,

    /// Downstream step, set by `connect`
    next: Downstream,

    /// Counters
    metrics: BatchMetrics,
}

impl BatchTransform {
    /// Create a batcher for `topic` (max size clamped to 1)
    ///
    /// The construction time counts as the last flush, so the first
    /// time-based flush fires one `flush_interval` from now.
    pub fn new(topic: impl Into<Topic>, max_size: usize, flush_interval: Duration) -> Self {
        Self::with_settings(topic, BatchSettings::new(max_size, flush_interval))
    }

    /// Create a batcher from validated settings
    pub fn try_new(topic: impl Into<Topic>, settings: BatchSettings) -> TransformResult<Self> {
        settings.validate().map_err(TransformError::config)?;
        Ok(Self::with_settings(topic, settings))
    }

    pub(crate) fn with_settings(topic: impl Into<Topic>, settings: BatchSettings) -> Self {
        Self::with_downstream(topic, settings, Downstream::default())
    }

    /// Create a batcher that reads its downstream from a shared slot
    ///
    /// Connecting any holder of the slot rewires all of them.
    pub(crate) fn with_downstream(
        topic: impl Into<Topic>,
        settings: BatchSettings,
        next: Downstream,
    ) -> Self {
        Self {
            topic: topic.into(),
            settings,
            state: Mutex::new(BatchState::new()),
            next,
            metrics: BatchMetrics::default(),
        }
    }

    /// Topic served by this batcher
    #[inline]
    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    /// Flush thresholds
    #[inline]
    pub fn settings(&self) -> BatchSettings {
        self.settings
    }

    /// Get batcher metrics
    pub fn metrics(&self) -> &BatchMetrics {
        &self.metrics
    }

    /// Number of facts waiting to be flushed
    pub async fn len(&self) -> usize {
        self.state.lock().await.len()
    }

    /// Whether nothing is buffered
    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.is_empty()
    }

    /// Whether a downstream step has been connected
    pub fn is_connected(&self) -> bool {
        self.next.read().is_some()
    }

    /// Flush whatever is buffered, regardless of size
    ///
    /// Used for manual and shutdown draining. A no-op on an empty buffer.
    pub async fn flush(&self) -> Result<(), StepError> {
        let mut state = self.state.lock().await;
        self.flush_locked(&mut state, 1).await
    }

    fn next(&self) -> Option<Arc<dyn Step>> {
        self.next.read().clone()
    }

    /// Write the whole buffer downstream if it holds at least `threshold` facts
    ///
    /// Must be called with the state lock held. On failure the buffer and the
    /// last-flush time are left untouched so the next trigger retries them.
    async fn flush_locked(&self, state: &mut BatchState, threshold: usize) -> Result<(), StepError> {
        let next = self
            .next()
            .ok_or_else(|| StepError::not_connected("batch"))?;

        if !state.reached(threshold) {
            return Ok(());
        }

        let count = state.len();
        tracing::debug!(topic = %self.topic, count, "flushing batch");

        match next.write(&self.topic, state.facts()).await {
            Ok(()) => {
                state.mark_flushed();
                self.metrics.flushes.fetch_add(1, Ordering::Relaxed);
                self.metrics
                    .facts_flushed
                    .fetch_add(count as u64, Ordering::Relaxed);
                Ok(())
            }
            Err(e) => {
                self.metrics.flush_errors.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(
                    topic = %self.topic,
                    count,
                    error = %e,
                    "failed to flush batch, keeping facts for retry"
                );
                Err(e)
            }
        }
    }
}

#[async_trait]
impl Heartbeat for BatchTransform {
    /// Tick downstream first, then flush if the interval has elapsed
    async fn heartbeat(&self) {
        let Some(next) = self.next() else {
            let state = self.state.lock().await;
            if !state.is_empty() && state.is_due(self.settings.flush_interval) {
                self.metrics.flushes_skipped.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(
                    topic = %self.topic,
                    count = state.len(),
                    "batch is due but no downstream is connected"
                );
            }
            return;
        };
        next.heartbeat().await;

        let mut state = self.state.lock().await;
        if state.is_due(self.settings.flush_interval) {
            // Failure is already logged and the facts stay buffered
            let _ = self.flush_locked(&mut state, 1).await;
        }
    }
}

#[async_trait]
impl Step for BatchTransform {
    async fn write(&self, topic: &Topic, facts: &[Fact]) -> Result<(), StepError> {
        let mut state = self.state.lock().await;

        if *topic == self.topic {
            state.append(facts);
            self.metrics
                .facts_buffered
                .fetch_add(facts.len() as u64, Ordering::Relaxed);
        } else {
            self.metrics
                .facts_dropped
                .fetch_add(facts.len() as u64, Ordering::Relaxed);
        }

        self.flush_locked(&mut state, self.settings.max_size).await
    }
}

impl Transform for BatchTransform {
    fn connect(&self, next: Arc<dyn Step>) {
        *self.next.write() = Some(next);
    }
}

impl std::fmt::Debug for BatchTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchTransform")
            .field("topic", &self.topic)
            .field("settings", &self.settings)
            .field("connected", &self.is_connected())
            .field("metrics", &self.metrics)
            .finish()
    }
}
