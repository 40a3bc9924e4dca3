//! Table store contract
//!
//! A table store persists rows into named tables. Tables are created on
//! demand by the sink the first time an insert reports them missing.

use async_trait::async_trait;
use flow_protocol::{BoxError, Fact};
use serde::Serialize;
use thiserror::Error;

/// Column types understood by table stores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    String,
    Bytes,
    Timestamp,
}

/// A single column definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnType,
    pub nullable: bool,
}

impl Column {
    const fn required(name: &'static str, kind: ColumnType) -> Self {
        Self {
            name,
            kind,
            nullable: false,
        }
    }

    const fn nullable(name: &'static str, kind: ColumnType) -> Self {
        Self {
            name,
            kind,
            nullable: true,
        }
    }
}

/// Table layout used when creating a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSchema {
    pub columns: &'static [Column],
}

impl TableSchema {
    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Schema of every fact table
///
/// ```sql
/// CREATE TABLE <topic> (
///     _factId        STRING NOT NULL,
///     _transactionId STRING,
///     _data          BYTES NOT NULL,
///     _timestamp     TIMESTAMP NOT NULL
/// );
/// ```
pub const FACT_SCHEMA: TableSchema = TableSchema {
    columns: &[
        Column::required("_factId", ColumnType::String),
        Column::nullable("_transactionId", ColumnType::String),
        Column::required("_data", ColumnType::Bytes),
        Column::required("_timestamp", ColumnType::Timestamp),
    ],
};

/// A fact ready for insertion
///
/// `insert_id` lets the store drop duplicates when a write is retried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    #[serde(rename = "insertId")]
    pub insert_id: String,

    #[serde(flatten)]
    pub fact: Fact,
}

/// Table store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// The target table does not exist
    #[error("table '{0}' not found")]
    TableNotFound(String),

    /// A table with this name already exists
    #[error("table '{0}' already exists")]
    AlreadyExists(String),

    /// Any other backend failure
    #[error("backend error: {0}")]
    Backend(#[source] BoxError),
}

impl StoreError {
    /// Wrap a backend error
    pub fn backend(err: impl Into<BoxError>) -> Self {
        Self::Backend(err.into())
    }

    /// Whether the error reports a missing table
    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TableNotFound(_))
    }
}

/// Persistent row storage addressed by table name
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Insert rows into `table`
    ///
    /// Must return [`StoreError::TableNotFound`] when the table is missing.
    async fn insert(&self, table: &str, rows: &[TableRow]) -> Result<(), StoreError>;

    /// Create `table` with the given schema
    async fn create_table(&self, table: &str, schema: &TableSchema) -> Result<(), StoreError>;
}
