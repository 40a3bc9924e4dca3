//! Noop Transform - Pass-through stage
//!
//! Forwards writes and heartbeats unchanged. Useful for:
//! - Testing chain wiring
//! - Placeholder links while assembling a pipeline

use std::sync::Arc;

use flow_protocol::{Fact, Heartbeat, Step, StepError, Topic, Transform, async_trait};
use parking_lot::RwLock;


/// A transform that passes facts through unchanged
#[derive(Default)]
pub struct NoopTransform {
    next: RwLock<Option<Arc<dyn Step>>>,
}

impl NoopTransform {
    /// Create a new, unconnected noop transform
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&self) -> Option<Arc<dyn Step>> {
        self.next.read().clone()
    }
}

#[async_trait]
impl Heartbeat for NoopTransform {
    async fn heartbeat(&self) {
        if let Some(next) = self.next() {
            next.heartbeat().await;
        }
    }
}

#[async_trait]
impl Step for NoopTransform {
    async fn write(&self, topic: &Topic, facts: &[Fact]) -> Result<(), StepError> {
        let next = self
            .next()
            .ok_or_else(|| StepError::not_connected("noop"))?;
        next.write(topic, facts).await
    }
}

impl Transform for NoopTransform {
    fn connect(&self, next: Arc<dyn Step>) {
        *self.next.write() = Some(next);
    }
}

impl std::fmt::Debug for NoopTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoopTransform")
            .field("connected", &self.next.read().is_some())
            .finish()
    }
}
