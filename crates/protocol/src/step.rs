//! Stage contracts
//!
//! Every pipeline stage implements one or more of these capability traits:
//!
//! - [`Heartbeat`] - periodic housekeeping, driven by the scheduler
//! - [`Step`] - accepts facts for a topic
//! - [`Transform`] - a step that forwards into a connected downstream step
//! - [`Runnable`] - a unit the scheduler polls, usually a source
//!
//! ```text
//! [Source] --write--> [Transform] --write--> ... --write--> [Sink]
//!     \____heartbeat______/\_________heartbeat______________/
//! ```
//!
//! Write and heartbeat calls are cancelled by dropping their futures; wrap
//! them in `tokio::time::timeout` or `select!` to bound them. `Runnable::run`
//! additionally receives the scheduler's cancellation token so long polls can
//! bail out early.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::{BoxError, StepError};
use crate::fact::Fact;
use crate::topic::Topic;

/// Periodic housekeeping hook
///
/// Implementations must not block indefinitely. There is no error channel:
/// failures are logged by the stage itself.
#[async_trait]
pub trait Heartbeat: Send + Sync {
    /// Run one round of housekeeping (e.g. a time-based flush)
    async fn heartbeat(&self);
}

/// A write-capable stage
///
/// Must be safe to call concurrently when reachable from several producers.
#[async_trait]
pub trait Step: Heartbeat {
    /// Accept facts for a topic
    async fn write(&self, topic: &Topic, facts: &[Fact]) -> Result<(), StepError>;
}

/// Terminal stage performing the durable write
///
/// Any `Step` can terminate a chain; the marker exists for readability at
/// wiring sites.
pub trait Sink: Step {}

impl<T: Step + ?Sized> Sink for T {}

/// A stage that forwards into a downstream step
pub trait Transform: Step {
    /// Connect the downstream step (last call wins)
    ///
    /// Wiring is expected to complete before traffic starts.
    fn connect(&self, next: Arc<dyn Step>);
}

/// Fluent chain building on top of [`Transform::connect`]
pub trait TransformExt: Transform {
    /// Connect `next` as the downstream step and return it
    ///
    /// ```ignore
    /// source.then(batcher).then(filter).connect(sink);
    /// ```
    fn then<N>(&self, next: Arc<N>) -> Arc<N>
    where
        N: Step + 'static,
    {
        self.connect(next.clone());
        next
    }
}

impl<T: Transform + ?Sized> TransformExt for T {}

/// Outcome of one `Runnable::run` invocation
#[derive(Debug)]
pub enum RunOutcome {
    /// Work done; run again after this delay
    Continue(Duration),

    /// Transient failure; the scheduler logs it and retries after its backoff
    Failed(BoxError),

    /// Stop polling this unit for good
    Terminate,
}

impl RunOutcome {
    /// Create a failed outcome from any error
    pub fn failed(err: impl Into<BoxError>) -> Self {
        Self::Failed(err.into())
    }

    /// Whether this outcome ends the run loop
    #[inline]
    pub fn is_terminate(&self) -> bool {
        matches!(self, Self::Terminate)
    }
}

/// A unit driven by the scheduler: periodic heartbeat plus a pull loop
#[async_trait]
pub trait Runnable: Heartbeat {
    /// Perform one unit of work (poll, pull, ...)
    async fn run(&self, cancel: &CancellationToken) -> RunOutcome;
}
