use std::collections::BTreeMap;

use async_trait::async_trait;

use nesprisa_core::{TableName, TableRows};

use super::{IdSequences, RowStore, StoreError};

/// Keeps persisted batches in memory; they become visible on commit.
#[derive(Debug, Default)]
pub struct MemoryStore {
    run_id: Option<String>,
    staged: Vec<TableRows>,
    committed: BTreeMap<TableName, Vec<TableRows>>,
    sequences: IdSequences,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed batches of `table`, in persist order.
    pub fn batches(&self, table: TableName) -> &[TableRows] {
        self.committed
            .get(&table)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn committed_rows(&self, table: TableName) -> usize {
        self.batches(table).iter().map(TableRows::len).sum()
    }

    pub fn total_committed_rows(&self) -> usize {
        self.committed
            .values()
            .flat_map(|batches| batches.iter())
            .map(TableRows::len)
            .sum()
    }

    pub fn in_transaction(&self) -> bool {
        self.run_id.is_some()
    }

    fn require_open(&self) -> Result<(), StoreError> {
        if self.run_id.is_none() {
            return Err(StoreError::State("no open run".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl RowStore for MemoryStore {
    async fn begin(&mut self, run_id: &str) -> Result<(), StoreError> {
        if let Some(open) = &self.run_id {
            return Err(StoreError::State(format!("run '{open}' is still open")));
        }
        self.run_id = Some(run_id.to_string());
        Ok(())
    }

    async fn persist(&mut self, mut rows: TableRows) -> Result<TableRows, StoreError> {
        self.require_open()?;
        self.sequences.assign(&mut rows);
        self.staged.push(rows.clone());
        Ok(rows)
    }

    async fn commit(&mut self) -> Result<(), StoreError> {
        self.require_open()?;
        for rows in self.staged.drain(..) {
            self.committed.entry(rows.table()).or_default().push(rows);
        }
        self.run_id = None;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), StoreError> {
        self.staged.clear();
        self.run_id = None;
        Ok(())
    }
}
