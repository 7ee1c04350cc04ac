//! Persistence boundary for generated batches.
//!
//! A run opens one unit of work with [`RowStore::begin`], persists each
//! table batch in dependency order and then either commits or rolls back.
//! `persist` hands back the rows as stored, with generated columns filled.

pub mod csv;
pub mod memory;

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;

use nesprisa_core::{TableName, TableRows};

pub use self::csv::CsvStore;
pub use self::memory::MemoryStore;

/// Errors raised by a row store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("database error: {0}")]
    Database(String),
    #[error("invalid store state: {0}")]
    State(String),
}

#[async_trait]
pub trait RowStore: Send {
    /// Opens the unit of work for run `run_id`.
    async fn begin(&mut self, run_id: &str) -> Result<(), StoreError>;

    /// Persists a batch and returns it with generated columns assigned.
    async fn persist(&mut self, rows: TableRows) -> Result<TableRows, StoreError>;

    async fn commit(&mut self) -> Result<(), StoreError>;

    /// Discards everything persisted since `begin`.
    async fn rollback(&mut self) -> Result<(), StoreError>;
}

/// Per-table counters for generated integer columns, starting at 1.
#[derive(Debug, Default, Clone)]
pub struct IdSequences {
    next: BTreeMap<TableName, i64>,
}

impl IdSequences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fills the generated column of every row; batches without one are left as is.
    pub fn assign(&mut self, rows: &mut TableRows) {
        if rows.generated_column().is_none() {
            return;
        }
        let next = self.next.entry(rows.table()).or_insert(1);
        for index in 0..rows.len() {
            rows.assign_generated(index, *next);
            *next += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use nesprisa_core::{Carrito, Pais};

    use super::*;

    fn carrito(dni: &str) -> Carrito {
        Carrito {
            id_tienda: "t1".to_string(),
            id_carrito: None,
            fecha: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            dni_cliente: dni.to_string(),
        }
    }

    #[test]
    fn carrito_ids_continue_across_batches() {
        let mut sequences = IdSequences::new();
        let mut first = TableRows::from(vec![carrito("1A"), carrito("2B")]);
        let mut second = TableRows::from(vec![carrito("3C")]);
        sequences.assign(&mut first);
        sequences.assign(&mut second);

        let ids: Vec<Option<i64>> = [first, second]
            .iter()
            .flat_map(|rows| match rows {
                TableRows::Carrito(rows) => rows.iter().map(|c| c.id_carrito).collect(),
                _ => Vec::new(),
            })
            .collect();
        assert_eq!(ids, vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn tables_without_generated_column_are_untouched() {
        let mut sequences = IdSequences::new();
        let pais = Pais {
            id_pais: "p".to_string(),
            nombre: "Peru".to_string(),
        };
        let mut rows = TableRows::from(vec![pais.clone()]);
        sequences.assign(&mut rows);
        assert_eq!(rows, TableRows::from(vec![pais]));
    }
}
