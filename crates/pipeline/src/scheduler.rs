//! Scheduler - Drives runnables until cancelled
//!
//! Every runnable gets two tasks:
//!
//! ```text
//!             ┌─→ tick loop:  sleep(heartbeat_interval) → heartbeat() → ...
//! runnable ───┤
//!             └─→ run loop:   run() → sleep(delay)                   → ...
//! ```
//!
//! Both loops check the shared cancellation token between iterations and
//! while sleeping. An in-flight `heartbeat` or `run` is never aborted; a
//! runnable that wants to stop early during `run` watches the token it is
//! given.
//!
//! A runnable returning [`RunOutcome::Terminate`] stops its run loop only.
//! Its tick loop keeps delivering heartbeats, so buffered data downstream is
//! still flushed on time.

use std::sync::Arc;
use std::time::Duration;

use flow_config::SchedulerConfig;
use flow_protocol::{CancellationToken, RunOutcome, Runnable};
use tokio::task::JoinSet;

use crate::error::PipelineError;
use crate::metrics::SchedulerMetrics;

#[cfg(test)]
#[path = "scheduler_test.rs"]
mod tests;

/// Default delay between heartbeats
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(1);

/// Default delay before re-running a runnable whose last run failed
pub const ERROR_BACKOFF: Duration = Duration::from_secs(1);

/// Scheduler timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerSettings {
    /// Delay between heartbeats of each runnable
    pub heartbeat_interval: Duration,

    /// Delay after a failed run
    pub error_backoff: Duration,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            heartbeat_interval: HEARTBEAT_INTERVAL,
            error_backoff: ERROR_BACKOFF,
        }
    }
}

impl SchedulerSettings {
    /// Set the heartbeat interval
    pub fn with_heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = interval;
        self
    }

    /// Set the failure backoff
    pub fn with_error_backoff(mut self, backoff: Duration) -> Self {
        self.error_backoff = backoff;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.heartbeat_interval.is_zero() {
            return Err("heartbeat_interval must be positive".to_string());
        }
        Ok(())
    }
}

impl TryFrom<&SchedulerConfig> for SchedulerSettings {
    type Error = PipelineError;

    fn try_from(config: &SchedulerConfig) -> Result<Self, Self::Error> {
        let settings = Self {
            heartbeat_interval: config.heartbeat_interval,
            error_backoff: config.error_backoff,
        };
        settings.validate().map_err(PipelineError::Config)?;
        Ok(settings)
    }
}

/// Runs the tick and run loops of a set of runnables
///
/// # Example
///
/// ```ignore
/// let scheduler = Scheduler::new(SchedulerSettings::default());
/// let cancel = CancellationToken::new();
///
/// tokio::spawn({
///     let cancel = cancel.clone();
///     async move {
///         tokio::signal::ctrl_c().await.ok();
///         cancel.cancel();
///     }
/// });
///
/// scheduler.run(cancel, vec![source]).await;
/// ```
#[derive(Debug, Default)]
pub struct Scheduler {
    settings: SchedulerSettings,

    /// Metrics (Arc for sharing with the loop tasks)
    metrics: Arc<SchedulerMetrics>,
}

impl Scheduler {
    /// Create a scheduler with the given timing
    pub fn new(settings: SchedulerSettings) -> Self {
        Self {
            settings,
            metrics: Arc::new(SchedulerMetrics::new()),
        }
    }

    /// Get the scheduler timing
    #[inline]
    pub fn settings(&self) -> SchedulerSettings {
        self.settings
    }

    /// Get reference to metrics
    #[inline]
    pub fn metrics(&self) -> &SchedulerMetrics {
        &self.metrics
    }

    /// Run every runnable until `cancel` fires
    ///
    /// Returns once all loop tasks have exited. With no runnables it returns
    /// immediately. A panicking loop is logged and does not affect the others.
    pub async fn run(&self, cancel: CancellationToken, runnables: Vec<Arc<dyn Runnable>>) {
        tracing::info!(
            runnables = runnables.len(),
            heartbeat_interval = ?self.settings.heartbeat_interval,
            error_backoff = ?self.settings.error_backoff,
            "scheduler starting"
        );

        let mut tasks = JoinSet::new();

        for (id, runnable) in runnables.into_iter().enumerate() {
            tasks.spawn(tick_loop(
                id,
                Arc::clone(&runnable),
                cancel.clone(),
                self.settings.heartbeat_interval,
                Arc::clone(&self.metrics),
            ));
            tasks.spawn(run_loop(
                id,
                runnable,
                cancel.clone(),
                self.settings.error_backoff,
                Arc::clone(&self.metrics),
            ));
        }

        while let Some(result) = tasks.join_next().await {
            if let Err(e) = result
                && e.is_panic()
            {
                self.metrics.record_panic();
                tracing::error!(error = %e, "scheduler task panicked");
            }
        }

        let snapshot = self.metrics.snapshot();
        tracing::info!(
            heartbeats = snapshot.heartbeats,
            runs = snapshot.runs,
            run_failures = snapshot.run_failures,
            "scheduler stopped"
        );
    }
}

/// Run `runnables` with the default timing until `cancel` fires
pub async fn run(cancel: CancellationToken, runnables: Vec<Arc<dyn Runnable>>) {
    Scheduler::default().run(cancel, runnables).await
}

/// Sleep for `delay`, returning false if cancelled first
async fn sleep_or_cancel(cancel: &CancellationToken, delay: Duration) -> bool {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(delay) => true,
    }
}

async fn tick_loop(
    id: usize,
    runnable: Arc<dyn Runnable>,
    cancel: CancellationToken,
    interval: Duration,
    metrics: Arc<SchedulerMetrics>,
) {
    tracing::debug!(runnable = id, "tick loop starting");

    while sleep_or_cancel(&cancel, interval).await {
        runnable.heartbeat().await;
        metrics.record_heartbeat();
    }

    tracing::debug!(runnable = id, "tick loop stopping");
}

async fn run_loop(
    id: usize,
    runnable: Arc<dyn Runnable>,
    cancel: CancellationToken,
    error_backoff: Duration,
    metrics: Arc<SchedulerMetrics>,
) {
    tracing::debug!(runnable = id, "run loop starting");

    while !cancel.is_cancelled() {
        let outcome = runnable.run(&cancel).await;
        metrics.record_run();

        let delay = match outcome {
            RunOutcome::Continue(delay) => delay,
            RunOutcome::Failed(e) => {
                metrics.record_failure();
                tracing::warn!(runnable = id, error = %e, "run failed, backing off");
                error_backoff
            }
            RunOutcome::Terminate => {
                metrics.record_termination();
                tracing::info!(runnable = id, "runnable terminated, run loop stopping");
                return;
            }
        };

        if !sleep_or_cancel(&cancel, delay).await {
            break;
        }
    }

    tracing::debug!(runnable = id, "run loop stopping");
}
