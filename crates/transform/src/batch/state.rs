//! Batch buffer state
//!
//! Owned by a single `BatchTransform` and only touched under its lock.

use std::time::Duration;

use flow_protocol::Fact;
use tokio::time::Instant;

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;

/// Buffered facts plus the time of the last successful flush
#[derive(Debug)]
pub struct BatchState {
    /// Facts waiting to be flushed, in arrival order
    buffer: Vec<Fact>,

    /// Time of the last successful flush (construction time initially)
    last_flush: Instant,
}

impl BatchState {
    /// Create an empty state, treating "now" as the last flush
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            last_flush: Instant::now(),
        }
    }

    /// Append facts to the buffer
    #[inline]
    pub fn append(&mut self, facts: &[Fact]) {
        self.buffer.extend_from_slice(facts);
    }

    /// Buffered facts
    #[inline]
    pub fn facts(&self) -> &[Fact] {
        &self.buffer
    }

    /// Number of buffered facts
    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether the buffer is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Whether the buffer has reached `threshold` facts
    #[inline]
    pub fn reached(&self, threshold: usize) -> bool {
        !self.buffer.is_empty() && self.buffer.len() >= threshold
    }

    /// Whether `interval` has elapsed since the last successful flush
    #[inline]
    pub fn is_due(&self, interval: Duration) -> bool {
        self.last_flush.elapsed() >= interval
    }

    /// Time since the last successful flush
    #[inline]
    pub fn since_flush(&self) -> Duration {
        self.last_flush.elapsed()
    }

    /// Record a successful flush: drop the buffer and restart the interval
    pub fn mark_flushed(&mut self) {
        self.buffer.clear();
        self.last_flush = Instant::now();
    }
}

impl Default for BatchState {
    fn default() -> Self {
        Self::new()
    }
}
