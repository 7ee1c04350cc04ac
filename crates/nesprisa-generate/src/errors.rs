use thiserror::Error;

use nesprisa_core::TableName;

use crate::store::StoreError;

/// Errors emitted by the generation engine.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(
        "table '{table}' exhausted its key space: requested {requested} rows, {available} available"
    )]
    Exhaustion {
        table: TableName,
        requested: usize,
        available: usize,
    },
    #[error("table '{table}' requires rows from '{dependency}' but none were generated")]
    MissingDependency {
        table: TableName,
        dependency: TableName,
    },
    #[error("unknown table '{0}'")]
    UnknownTable(String),
    #[error("table '{table}' references '{parent}' rows that were not persisted yet")]
    UnpersistedParent { table: TableName, parent: TableName },
    #[error("rows for table '{0}' were already added to the run")]
    DuplicatePool(TableName),
    #[error("invalid options: {0}")]
    InvalidOptions(String),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl From<nesprisa_core::Error> for GenerationError {
    fn from(err: nesprisa_core::Error) -> Self {
        match err {
            nesprisa_core::Error::UnknownTable(name) => GenerationError::UnknownTable(name),
            other => GenerationError::InvalidOptions(other.to_string()),
        }
    }
}
