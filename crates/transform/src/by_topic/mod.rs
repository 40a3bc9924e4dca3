//! Batch By Topic - Fan mixed-topic writes out to per-topic batchers
//!
//! Keeps one [`BatchTransform`] per topic, created lazily on the first write
//! for that topic and kept for the lifetime of the router. Every batcher
//! shares the router's settings and downstream step; `connect` rewires all
//! of them, including batchers created before it.
//!
//! # Dispatch
//!
//! Each write goes only to the batcher of its topic. Batchers still filter by
//! topic themselves, so isolation does not depend on the dispatch.
//!
//! # Example
//!
//! ```ignore
//! let router = Arc::new(BatchByTopic::new(500, Duration::from_secs(5)));
//! router.connect(sink);
//!
//! router.write(&Topic::new("orders"), &orders).await?;
//! router.write(&Topic::new("clicks"), &clicks).await?;
//! assert_eq!(router.topics().await.len(), 2);
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use flow_protocol::{Fact, Heartbeat, Step, StepError, Topic, Transform, async_trait};
use tokio::sync::Mutex;

use crate::batch::{BatchSettings, BatchTransform, Downstream};
use crate::{TransformError, TransformResult};

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

/// Multi-topic batch router
pub struct BatchByTopic {
    /// Settings given to every batcher
    settings: BatchSettings,

    /// Topic to batcher, guarded so each topic gets exactly one batcher
    targets: Mutex<HashMap<Topic, Arc<BatchTransform>>>,

    /// Downstream step, shared with every batcher
    next: Downstream,
}

impl BatchByTopic {
    /// Create a router whose batchers flush at `max_size` facts or every
    /// `flush_interval`
    pub fn new(max_size: usize, flush_interval: Duration) -> Self {
        Self::with_settings(BatchSettings::new(max_size, flush_interval))
    }

    /// Create a router from validated settings
    pub fn try_new(settings: BatchSettings) -> TransformResult<Self> {
        settings.validate().map_err(TransformError::config)?;
        Ok(Self::with_settings(settings))
    }

    fn with_settings(settings: BatchSettings) -> Self {
        Self {
            settings,
            targets: Mutex::new(HashMap::new()),
            next: Downstream::default(),
        }
    }

    /// Settings shared by every batcher
    #[inline]
    pub fn settings(&self) -> BatchSettings {
        self.settings
    }

    /// Topics that have a batcher, sorted
    pub async fn topics(&self) -> Vec<Topic> {
        let mut topics: Vec<_> = self.targets.lock().await.keys().cloned().collect();
        topics.sort();
        topics
    }

    /// Batcher for `topic`, if one has been created
    pub async fn batcher(&self, topic: &str) -> Option<Arc<BatchTransform>> {
        self.targets.lock().await.get(topic).cloned()
    }

    /// Number of batchers
    pub async fn len(&self) -> usize {
        self.targets.lock().await.len()
    }

    /// Whether no topic has been written yet
    pub async fn is_empty(&self) -> bool {
        self.targets.lock().await.is_empty()
    }

    /// Force every batcher to flush
    ///
    /// All batchers are attempted; the first error is returned.
    pub async fn flush(&self) -> Result<(), StepError> {
        let targets = self.targets.lock().await;
        let mut first_err = None;

        for batcher in targets.values() {
            if let Err(e) = batcher.flush().await
                && first_err.is_none()
            {
                first_err = Some(e);
            }
        }

        first_err.map_or(Ok(()), Err)
    }

    /// Build a batcher sharing the router's downstream slot
    fn create_batcher(&self, topic: &Topic) -> Arc<BatchTransform> {
        let batcher = Arc::new(BatchTransform::with_downstream(
            topic.clone(),
            self.settings,
            Arc::clone(&self.next),
        ));
        tracing::debug!(topic = %topic, "created batcher");
        batcher
    }
}

#[async_trait]
impl Heartbeat for BatchByTopic {
    async fn heartbeat(&self) {
        let targets = self.targets.lock().await;
        for batcher in targets.values() {
            batcher.heartbeat().await;
        }
    }
}

#[async_trait]
impl Step for BatchByTopic {
    async fn write(&self, topic: &Topic, facts: &[Fact]) -> Result<(), StepError> {
        let mut targets = self.targets.lock().await;

        let batcher = match targets.get(topic) {
            Some(batcher) => Arc::clone(batcher),
            None => {
                let batcher = self.create_batcher(topic);
                targets.insert(topic.clone(), Arc::clone(&batcher));
                batcher
            }
        };

        batcher.write(topic, facts).await
    }
}

impl Transform for BatchByTopic {
    /// Set the downstream step of every batcher, existing and future
    fn connect(&self, next: Arc<dyn Step>) {
        *self.next.write() = Some(next);
    }
}

impl std::fmt::Debug for BatchByTopic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchByTopic")
            .field("settings", &self.settings)
            .field("connected", &self.next.read().is_some())
            .finish()
    }
}
