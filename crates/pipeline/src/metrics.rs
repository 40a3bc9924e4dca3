//! Scheduler metrics
//!
//! Atomic counters for tracking the tick and run loops.
//! All operations use relaxed ordering.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for the scheduler
///
/// These metrics are eventually consistent, not real-time.
///
/// # Thread Safety
///
/// All methods are safe to call from multiple tasks concurrently. Values
/// may be slightly stale when read.
#[derive(Debug, Default)]
pub struct SchedulerMetrics {
    /// Heartbeats delivered to runnables
    heartbeats: AtomicU64,

    /// Completed `run` invocations
    runs: AtomicU64,

    /// Runs that reported a failure
    run_failures: AtomicU64,

    /// Run loops stopped by a runnable asking to terminate
    terminations: AtomicU64,

    /// Loop tasks that panicked
    panics: AtomicU64,
}

impl SchedulerMetrics {
    /// Create new metrics instance with all counters at zero
    #[inline]
    pub const fn new() -> Self {
        Self {
            heartbeats: AtomicU64::new(0),
            runs: AtomicU64::new(0),
            run_failures: AtomicU64::new(0),
            terminations: AtomicU64::new(0),
            panics: AtomicU64::new(0),
        }
    }

    /// Record a delivered heartbeat
    #[inline]
    pub fn record_heartbeat(&self) {
        self.heartbeats.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a completed run
    #[inline]
    pub fn record_run(&self) {
        self.runs.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed run
    #[inline]
    pub fn record_failure(&self) {
        self.run_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a terminated run loop
    #[inline]
    pub fn record_termination(&self) {
        self.terminations.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a panicked task
    #[inline]
    pub fn record_panic(&self) {
        self.panics.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of all metrics
    #[inline]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            heartbeats: self.heartbeats.load(Ordering::Relaxed),
            runs: self.runs.load(Ordering::Relaxed),
            run_failures: self.run_failures.load(Ordering::Relaxed),
            terminations: self.terminations.load(Ordering::Relaxed),
            panics: self.panics.load(Ordering::Relaxed),
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.heartbeats.store(0, Ordering::Relaxed);
        self.runs.store(0, Ordering::Relaxed);
        self.run_failures.store(0, Ordering::Relaxed);
        self.terminations.store(0, Ordering::Relaxed);
        self.panics.store(0, Ordering::Relaxed);
    }
}

/// Point-in-time snapshot of scheduler metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub heartbeats: u64,
    pub runs: u64,
    pub run_failures: u64,
    pub terminations: u64,
    pub panics: u64,
}

impl MetricsSnapshot {
    /// Fraction of runs that failed (0.0 when nothing ran)
    pub fn failure_rate(&self) -> f64 {
        if self.runs == 0 {
            return 0.0;
        }
        self.run_failures as f64 / self.runs as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_record() {
        let metrics = SchedulerMetrics::new();
        metrics.record_heartbeat();
        metrics.record_heartbeat();
        metrics.record_run();
        metrics.record_run();
        metrics.record_failure();
        metrics.record_termination();
        metrics.record_panic();

        assert_eq!(
            metrics.snapshot(),
            MetricsSnapshot {
                heartbeats: 2,
                runs: 2,
                run_failures: 1,
                terminations: 1,
                panics: 1,
            }
        );
    }

    #[test]
    fn test_metrics_reset() {
        let metrics = SchedulerMetrics::new();
        metrics.record_run();
        metrics.reset();
        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_failure_rate() {
        assert_eq!(MetricsSnapshot::default().failure_rate(), 0.0);

        let snapshot = MetricsSnapshot {
            runs: 4,
            run_failures: 1,
            ..Default::default()
        };
        assert!((snapshot.failure_rate() - 0.25).abs() < f64::EPSILON);
    }
}
