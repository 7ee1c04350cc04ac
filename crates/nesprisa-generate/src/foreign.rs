use std::collections::BTreeMap;

use nesprisa_core::{Record, TableName, TableRows};

use crate::errors::GenerationError;

/// Parent pools accumulated over a run, one immutable batch per table.
///
/// A table's rows are ingested once, after the store persisted them and
/// assigned any generated columns. Generators only ever read from here.
#[derive(Debug, Default, Clone)]
pub struct SeedContext {
    pools: BTreeMap<TableName, TableRows>,
}

impl SeedContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the persisted rows of a table to the context.
    pub fn ingest_table(&mut self, rows: TableRows) -> Result<(), GenerationError> {
        let table = rows.table();
        if self.pools.contains_key(&table) {
            return Err(GenerationError::DuplicatePool(table));
        }
        self.pools.insert(table, rows);
        Ok(())
    }

    pub fn rows(&self, table: TableName) -> Option<&TableRows> {
        self.pools.get(&table)
    }

    pub fn pool<T: Record>(&self) -> Option<&[T]> {
        self.pools.get(&T::TABLE).and_then(T::pool)
    }

    /// Non-empty pool of `T` needed to generate `table`.
    pub fn require<T: Record>(&self, table: TableName) -> Result<&[T], GenerationError> {
        match self.pool::<T>() {
            Some(rows) if !rows.is_empty() => Ok(rows),
            _ => Err(GenerationError::MissingDependency {
                table,
                dependency: T::TABLE,
            }),
        }
    }

    pub fn tables(&self) -> impl Iterator<Item = TableName> + '_ {
        self.pools.keys().copied()
    }

    pub fn row_count(&self, table: TableName) -> usize {
        self.pools.get(&table).map(TableRows::len).unwrap_or(0)
    }
}
