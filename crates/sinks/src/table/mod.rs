//! Table Sink - Durable writes into per-topic tables
//!
//! Every topic maps to a table of the same name. Facts are converted to rows
//! keyed by their identifier so a retried insert does not duplicate data.
//!
//! # Missing tables
//!
//! ```text
//! insert ──ok──────────────────────────────> done
//!    └──TableNotFound──> create_table ──> insert (once) ──> result
//! ```
//!
//! A freshly created table may still reject the retry on eventually
//! consistent stores; that error is returned and the caller's batcher keeps
//! the facts for the next flush.

mod memory;
mod store;

use std::sync::Arc;

use flow_protocol::{Fact, Heartbeat, Step, StepError, Topic, async_trait};
use uuid::Uuid;

use crate::common::{SinkError, SinkMetrics};

pub use memory::MemoryTableStore;
pub use store::{Column, ColumnType, FACT_SCHEMA, StoreError, TableRow, TableSchema, TableStore};


/// Sink writing facts into a [`TableStore`]
pub struct TableSink<S> {
    store: Arc<S>,

    metrics: SinkMetrics,
}

impl<S: TableStore> TableSink<S> {
    /// Create a sink over `store`
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            metrics: SinkMetrics::new(),
        }
    }

    /// Get the underlying store
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Get reference to metrics
    pub fn metrics(&self) -> &SinkMetrics {
        &self.metrics
    }

    /// Insert rows, creating the table once if it is missing
    async fn insert(&self, table: &str, rows: &[TableRow]) -> Result<(), StoreError> {
        match self.store.insert(table, rows).await {
            Err(e) if e.is_not_found() => {
                tracing::info!(table, "table missing, creating");
                match self.store.create_table(table, &FACT_SCHEMA).await {
                    // Lost a creation race with a concurrent writer
                    Ok(()) | Err(StoreError::AlreadyExists(_)) => {}
                    Err(e) => return Err(e),
                }
                self.store.insert(table, rows).await
            }
            other => other,
        }
    }
}

/// Convert facts into rows, assigning identifiers where missing
///
/// A generated identifier is written into the row's fact as well, so the
/// stored `_factId` always equals the insert id.
pub fn rows(facts: &[Fact]) -> Vec<TableRow> {
    facts
        .iter()
        .map(|fact| {
            let mut fact = fact.clone();
            if !fact.has_id() {
                fact.fact_id = Uuid::new_v4().to_string();
            }
            TableRow {
                insert_id: fact.fact_id.clone(),
                fact,
            }
        })
        .collect()
}

#[async_trait]
impl<S: TableStore> Heartbeat for TableSink<S> {
    async fn heartbeat(&self) {}
}

#[async_trait]
impl<S: TableStore> Step for TableSink<S> {
    async fn write(&self, topic: &Topic, facts: &[Fact]) -> Result<(), StepError> {
        self.metrics.write_received();

        let rows = rows(facts);
        match self.insert(topic.as_str(), &rows).await {
            Ok(()) => {
                self.metrics.write_completed(rows.len() as u64);
                Ok(())
            }
            Err(e) => {
                self.metrics.write_error();
                tracing::warn!(%topic, count = rows.len(), error = %e, "table insert failed");
                Err(SinkError::from(e).into_step("table"))
            }
        }
    }
}

impl<S> std::fmt::Debug for TableSink<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableSink")
            .field("metrics", &self.metrics.snapshot())
            .finish()
    }
}
