//! Fact records
//!
//! A `Fact` is the unit of data that flows through the pipeline. Facts are
//! values: stages copy them into buffers and hand slices downstream, but never
//! change their fields.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An event record routed through the pipeline
///
/// An empty `fact_id` means "assign one on durable write". Sinks that need
/// idempotent inserts generate an identifier for such facts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
    /// Unique identifier (empty until assigned)
    #[serde(rename = "_factId")]
    pub fact_id: String,

    /// Identifier of the transaction that produced this fact
    #[serde(rename = "_transactionId", default)]
    pub transaction_id: Option<String>,

    /// Opaque payload
    #[serde(rename = "_data")]
    pub data: Bytes,

    /// When the fact happened
    #[serde(rename = "_timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl Fact {
    /// Create a fact with the given payload, stamped with the current time
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            fact_id: String::new(),
            transaction_id: None,
            data: data.into(),
            timestamp: Utc::now(),
        }
    }

    /// Set the fact identifier
    pub fn with_fact_id(mut self, id: impl Into<String>) -> Self {
        self.fact_id = id.into();
        self
    }

    /// Set the transaction identifier
    pub fn with_transaction_id(mut self, id: impl Into<String>) -> Self {
        self.transaction_id = Some(id.into());
        self
    }

    /// Set the timestamp
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Whether an identifier has been assigned
    #[inline]
    pub fn has_id(&self) -> bool {
        !self.fact_id.is_empty()
    }
}

impl Default for Fact {
    fn default() -> Self {
        Self::new(Bytes::new())
    }
}
