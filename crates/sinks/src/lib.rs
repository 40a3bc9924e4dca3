//! Flow - Sinks
//!
//! Terminal stages of a pipeline. A sink is any [`Step`](flow_protocol::Step)
//! at the end of a chain; it performs the durable write and reports failures
//! back to the batcher feeding it, which keeps the facts for the next flush.
//!
//! ```text
//! [Source] --> [Batcher] --facts--> [Sink] --> [Destination]
//! ```
//!
//! # Available Sinks
//!
//! | Sink | Purpose |
//! |------|---------|
//! | `table` | Per-topic tables, created on first write |
//! | `stdout` | Debug output, one JSON line per fact |
//! | `null` | Benchmarking (discard all) |
//!
//! # Example
//!
//! ```ignore
//! use flow_sinks::table::{MemoryTableStore, TableSink};
//!
//! let store = Arc::new(MemoryTableStore::new());
//! router.connect(Arc::new(TableSink::new(store.clone())));
//! ```

/// Null sink - discards all data (for benchmarking)
pub mod null;

/// Stdout sink - human-readable debug output
pub mod stdout;

/// Table sink - per-topic durable storage
pub mod table;

mod common;

pub use common::{MetricsSnapshot, SinkError, SinkMetrics};
pub use null::NullSink;
pub use stdout::{StdoutConfig, StdoutSink};
pub use table::{MemoryTableStore, StoreError, TableSink, TableStore};
