//! Source stub - a no-op origin stage
//!
//! `Source` has no polling work of its own: it forwards heartbeats down the
//! chain and asks to be run again after [`DEFAULT_RUN_INTERVAL`]. Stages that
//! do poll embed a `Source` and delegate wiring and heartbeats to it.
//!
//! ```ignore
//! struct Poller {
//!     base: Source,
//! }
//!
//! #[async_trait]
//! impl Heartbeat for Poller {
//!     async fn heartbeat(&self) {
//!         self.base.heartbeat().await
//!     }
//! }
//! ```

use std::sync::Arc;
use std::time::Duration;

use flow_protocol::{
    CancellationToken, Fact, Heartbeat, RunOutcome, Runnable, Step, StepError, Topic, Transform,
    async_trait,
};
use parking_lot::RwLock;

#[cfg(test)]
#[path = "stub_test.rs"]
mod tests;

/// Delay requested by a source with nothing to poll (one hour)
pub const DEFAULT_RUN_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Tick-forwarding base source
#[derive(Default)]
pub struct Source {
    next: RwLock<Option<Arc<dyn Step>>>,
}

impl Source {
    /// Create an unconnected source
    pub fn new() -> Self {
        Self::default()
    }

    /// Downstream step, if connected
    pub fn next(&self) -> Option<Arc<dyn Step>> {
        self.next.read().clone()
    }

    /// Whether a downstream step has been connected
    pub fn is_connected(&self) -> bool {
        self.next.read().is_some()
    }

    /// Forward facts to the downstream step
    pub async fn write(&self, topic: &Topic, facts: &[Fact]) -> Result<(), StepError> {
        let next = self
            .next()
            .ok_or_else(|| StepError::not_connected("source"))?;
        next.write(topic, facts).await
    }

    /// Connect the downstream step (last call wins)
    pub fn connect(&self, next: Arc<dyn Step>) {
        *self.next.write() = Some(next);
    }

    /// Connect `next` as the downstream step and return it for further chaining
    pub fn then<N>(&self, next: Arc<N>) -> Arc<N>
    where
        N: Transform + 'static,
    {
        self.connect(next.clone());
        next
    }
}

#[async_trait]
impl Heartbeat for Source {
    async fn heartbeat(&self) {
        if let Some(next) = self.next() {
            next.heartbeat().await;
        }
    }
}

#[async_trait]
impl Runnable for Source {
    async fn run(&self, _cancel: &CancellationToken) -> RunOutcome {
        RunOutcome::Continue(DEFAULT_RUN_INTERVAL)
    }
}

impl std::fmt::Debug for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Source")
            .field("connected", &self.is_connected())
            .finish()
    }
}
