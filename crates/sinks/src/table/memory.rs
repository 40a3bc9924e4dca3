//! In-memory table store
//!
//! Keeps tables in a map. Rows are deduplicated by `insert_id`, matching the
//! best-effort idempotency of streaming inserts.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::store::{StoreError, TableRow, TableSchema, TableStore};

#[derive(Debug)]
struct MemoryTable {
    schema: TableSchema,
    rows: Vec<TableRow>,
    ids: HashSet<String>,
}

/// Table store backed by process memory
#[derive(Debug, Default)]
pub struct MemoryTableStore {
    tables: Mutex<HashMap<String, MemoryTable>>,
}

impl MemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows stored in `table`, in insertion order
    pub fn rows(&self, table: &str) -> Option<Vec<TableRow>> {
        self.tables.lock().get(table).map(|t| t.rows.clone())
    }

    /// Names of all tables, sorted
    pub fn tables(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.lock().keys().cloned().collect();
        names.sort();
        names
    }

    /// Schema `table` was created with
    pub fn schema(&self, table: &str) -> Option<TableSchema> {
        self.tables.lock().get(table).map(|t| t.schema)
    }
}

#[async_trait]
impl TableStore for MemoryTableStore {
    async fn insert(&self, table: &str, rows: &[TableRow]) -> Result<(), StoreError> {
        let mut tables = self.tables.lock();
        let target = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;

        for row in rows {
            if target.ids.insert(row.insert_id.clone()) {
                target.rows.push(row.clone());
            }
        }
        Ok(())
    }

    async fn create_table(&self, table: &str, schema: &TableSchema) -> Result<(), StoreError> {
        let mut tables = self.tables.lock();
        if tables.contains_key(table) {
            return Err(StoreError::AlreadyExists(table.to_string()));
        }

        tables.insert(
            table.to_string(),
            MemoryTable {
                schema: *schema,
                rows: Vec::new(),
                ids: HashSet::new(),
            },
        );
        Ok(())
    }
}
