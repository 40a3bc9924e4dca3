//! Channel Source - Feed facts into a chain from any task
//!
//! Producers send `(topic, facts)` pairs through a [`ChannelSourceHandle`].
//! Each scheduler run drains up to `max_batches_per_run` pending pairs and
//! writes them downstream. Once every handle is dropped and the queue is
//! empty, the source asks the scheduler to stop running it.
//!
//! # Example
//!
//! ```ignore
//! let (source, handle) = ChannelSource::new(ChannelSourceConfig::default());
//! source.connect(router);
//!
//! handle.send(Topic::new("orders"), facts).await?;
//! ```

use std::sync::Arc;
use std::time::Duration;

use flow_protocol::{
    CancellationToken, Fact, Heartbeat, RunOutcome, Runnable, Step, Topic, Transform, async_trait,
};
use tokio::sync::{Mutex, mpsc};

use crate::common::{SourceError, SourceMetrics};
use crate::stub::Source;

#[cfg(test)]
#[path = "channel_test.rs"]
mod tests;

/// Default channel capacity
const DEFAULT_CHANNEL_CAPACITY: usize = 10_000;

/// Default delay between runs when the queue was drained
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Default number of queued writes forwarded per run
const DEFAULT_MAX_BATCHES_PER_RUN: usize = 1_000;

/// Configuration for the channel source
#[derive(Debug, Clone)]
pub struct ChannelSourceConfig {
    /// Channel capacity for queued writes
    pub channel_capacity: usize,

    /// Delay before the next run once the queue is empty
    pub poll_interval: Duration,

    /// Queued writes forwarded per run; a run that hits it is repeated
    /// without delay
    pub max_batches_per_run: usize,
}

impl Default for ChannelSourceConfig {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_batches_per_run: DEFAULT_MAX_BATCHES_PER_RUN,
        }
    }
}

impl ChannelSourceConfig {
    /// Set the poll interval
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the channel capacity
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    /// Set the writes forwarded per run
    pub fn with_max_batches_per_run(mut self, max: usize) -> Self {
        self.max_batches_per_run = max.max(1);
        self
    }
}

/// Handle for queueing facts into a [`ChannelSource`]
#[derive(Clone)]
pub struct ChannelSourceHandle {
    sender: mpsc::Sender<(Topic, Vec<Fact>)>,
}

impl ChannelSourceHandle {
    /// Queue facts, waiting if the channel is full
    ///
    /// Returns the facts back if the source has been dropped.
    pub async fn send(&self, topic: Topic, facts: Vec<Fact>) -> Result<(), Vec<Fact>> {
        self.sender
            .send((topic, facts))
            .await
            .map_err(|e| e.0.1)
    }

    /// Queue facts without waiting
    ///
    /// Returns the facts back if the channel is full or closed.
    pub fn try_send(&self, topic: Topic, facts: Vec<Fact>) -> Result<(), Vec<Fact>> {
        self.sender.try_send((topic, facts)).map_err(|e| match e {
            mpsc::error::TrySendError::Full(item) => item.1,
            mpsc::error::TrySendError::Closed(item) => item.1,
        })
    }

    /// Check if the source is still accepting facts
    pub fn is_active(&self) -> bool {
        !self.sender.is_closed()
    }
}

/// Polling source draining an in-process channel
pub struct ChannelSource {
    /// Wiring and heartbeat forwarding
    base: Source,

    /// Queued writes
    receiver: Mutex<mpsc::Receiver<(Topic, Vec<Fact>)>>,

    config: ChannelSourceConfig,

    metrics: Arc<SourceMetrics>,
}

impl ChannelSource {
    /// Create a source and the handle producers use to feed it
    pub fn new(config: ChannelSourceConfig) -> (Self, ChannelSourceHandle) {
        let (sender, receiver) = mpsc::channel(config.channel_capacity);

        let source = Self {
            base: Source::new(),
            receiver: Mutex::new(receiver),
            config,
            metrics: Arc::new(SourceMetrics::new()),
        };

        (source, ChannelSourceHandle { sender })
    }

    /// Connect the downstream step
    pub fn connect(&self, next: Arc<dyn Step>) {
        self.base.connect(next);
    }

    /// Connect `next` as the downstream step and return it
    pub fn then<N>(&self, next: Arc<N>) -> Arc<N>
    where
        N: Transform + 'static,
    {
        self.base.then(next)
    }

    /// Get source metrics
    pub fn metrics(&self) -> &SourceMetrics {
        &self.metrics
    }

    /// Forward up to `max_batches_per_run` queued writes
    ///
    /// A failed write is reported after the pairs drained before it have been
    /// forwarded; the failed pair is not requeued. Hitting the limit asks for
    /// an immediate rerun since more writes are likely queued.
    async fn drain(&self, cancel: &CancellationToken) -> RunOutcome {
        let mut receiver = self.receiver.lock().await;
        let limit = self.config.max_batches_per_run.max(1);
        let mut drained = 0;

        while drained < limit {
            if cancel.is_cancelled() {
                break;
            }

            let (topic, facts) = match receiver.try_recv() {
                Ok(item) => item,
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    tracing::info!("channel source closed, stopping");
                    return RunOutcome::Terminate;
                }
            };

            if let Err(e) = self.base.write(&topic, &facts).await {
                self.metrics.error();
                return RunOutcome::failed(SourceError::Forward {
                    topic: topic.to_string(),
                    source: e,
                });
            }
            self.metrics.forwarded(facts.len() as u64);
            drained += 1;
        }

        if drained == limit {
            return RunOutcome::Continue(Duration::ZERO);
        }
        RunOutcome::Continue(self.config.poll_interval)
    }
}

#[async_trait]
impl Heartbeat for ChannelSource {
    async fn heartbeat(&self) {
        self.base.heartbeat().await
    }
}

#[async_trait]
impl Runnable for ChannelSource {
    async fn run(&self, cancel: &CancellationToken) -> RunOutcome {
        self.metrics.run();
        self.drain(cancel).await
    }
}

impl std::fmt::Debug for ChannelSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelSource")
            .field("config", &self.config)
            .field("connected", &self.base.is_connected())
            .finish()
    }
}
