//! Flow - Pipeline
//!
//! The scheduler that drives sources and the chains behind them.
//!
//! # Architecture
//!
//! ```text
//! [Scheduler] ──heartbeat──→ [Source] ──→ [BatchByTopic] ──→ [Batch] ──→ [Sink]
//!      │                        │
//!      └────────run()───────────┘──write──→ ...
//! ```
//!
//! # Key Design
//!
//! - **Two loops per runnable**: ticks and pulls never delay each other
//! - **Cooperative shutdown**: one `CancellationToken` shared by every loop
//! - **Barrier**: `run` returns only after every loop has exited
//! - **Isolation**: a failing or panicking runnable does not stop the rest
//!
//! # Example
//!
//! ```ignore
//! use flow_pipeline::{Scheduler, SchedulerSettings};
//!
//! let settings = SchedulerSettings::try_from(&config.scheduler)?;
//! let scheduler = Scheduler::new(settings);
//!
//! scheduler.run(cancel, vec![source]).await;
//! ```

mod error;
mod metrics;
mod scheduler;

pub use error::{PipelineError, Result};
pub use metrics::{MetricsSnapshot, SchedulerMetrics};
pub use scheduler::{
    ERROR_BACKOFF, HEARTBEAT_INTERVAL, Scheduler, SchedulerSettings, run,
};
