//! Flow - Protocol
//!
//! Core types shared by every pipeline crate:
//! - `Fact` - the event record flowing through the pipeline
//! - `Topic` - routing key grouping facts into streams
//! - Stage contracts: `Heartbeat`, `Step`, `Sink`, `Transform`, `Runnable`
//! - `StepError` - write-path errors
//!
//! # Design Principles
//!
//! - **Capabilities, not hierarchies**: a stage implements only the traits it needs
//! - **Values in flight**: facts are cloned into buffers, never mutated
//! - **Arc wiring**: stages hold their downstream as `Arc<dyn Step>`

mod error;
mod fact;
mod step;
mod topic;

pub use error::{BoxError, StepError};
pub use fact::Fact;
pub use step::{Heartbeat, RunOutcome, Runnable, Sink, Step, Transform, TransformExt};
pub use topic::Topic;

// Re-exported so stage implementations share one version
pub use async_trait::async_trait;
pub use bytes::Bytes;
pub use tokio_util::sync::CancellationToken;

/// Result type for write-path operations
pub type Result<T> = std::result::Result<T, StepError>;

#[cfg(test)]
mod error_test;
