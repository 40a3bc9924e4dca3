//! Flow Sources
//!
//! Entry stages of a pipeline. A source is a [`Runnable`](flow_protocol::Runnable)
//! the scheduler polls; it writes what it produces into its connected chain
//! and forwards every heartbeat it receives.
//!
//! # Available Sources
//!
//! - **Stub** ([`Source`]) - wiring and heartbeat forwarding only; embed it in
//!   a concrete source
//! - **Channel** ([`ChannelSource`]) - drains facts queued by other tasks
//!
//! # Example
//!
//! ```ignore
//! use flow_sources::{ChannelSource, ChannelSourceConfig};
//! use flow_transform::BatchByTopic;
//!
//! let (source, handle) = ChannelSource::new(ChannelSourceConfig::default());
//! source.then(Arc::new(BatchByTopic::new(500, Duration::from_secs(5))))
//!     .connect(sink);
//!
//! handle.send(Topic::new("orders"), facts).await?;
//! ```

pub mod channel;
pub mod stub;

mod common;

pub use channel::{ChannelSource, ChannelSourceConfig, ChannelSourceHandle};
pub use common::{MetricsSnapshot, SourceError, SourceMetrics};
pub use stub::{DEFAULT_RUN_INTERVAL, Source};
