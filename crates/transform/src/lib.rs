//! Flow - Transform
//!
//! Stages that sit between sources and sinks.
//!
//! # Overview
//!
//! - `BatchTransform` - buffers one topic, flushes on size or age
//! - `BatchByTopic` - one lazily created `BatchTransform` per topic
//! - `NoopTransform` - pass-through link for testing chains
//!
//! # Architecture
//!
//! ```text
//! [Source] → [BatchByTopic] ─┬→ [Batch "orders"] ─┐
//!                            └→ [Batch "clicks"] ─┴→ [Sink]
//! ```
//!
//! # Flush Triggers
//!
//! Size is checked on every write, age only on heartbeat. A topic that
//! drains by volume never pays for the time check, while a quiet topic is
//! still flushed at most `flush_interval` after its last flush.
//!
//! Heartbeats travel downstream before a stage checks its own interval, so
//! inner stages flush first.
//!
//! # Example
//!
//! ```ignore
//! use flow_protocol::{Transform, TransformExt};
//! use flow_transform::BatchByTopic;
//!
//! let router = Arc::new(BatchByTopic::new(500, Duration::from_secs(5)));
//! source.then(router).connect(sink);
//! ```

mod by_topic;
mod error;
pub mod batch;
pub mod noop;

pub use batch::{
    BatchMetrics, BatchMetricsSnapshot, BatchSettings, BatchState, BatchTransform,
    DEFAULT_FLUSH_INTERVAL, DEFAULT_MAX_SIZE,
};
pub use by_topic::BatchByTopic;
pub use error::TransformError;
pub use noop::NoopTransform;

/// Result type for transform construction
pub type TransformResult<T> = Result<T, TransformError>;
