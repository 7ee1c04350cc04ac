use thiserror::Error;

use crate::tables::TableName;

/// Core error type shared across nesprisa crates.
#[derive(Debug, Error)]
pub enum Error {
    /// A table identifier that is not part of the schema.
    #[error("unknown table '{0}'")]
    UnknownTable(String),
    /// A run order places a table before one of its dependencies.
    #[error("table '{table}' is ordered before its dependency '{dependency}'")]
    InvalidOrder {
        table: TableName,
        dependency: TableName,
    },
    /// The dependency graph contains a cycle.
    #[error("dependency cycle between tables: {0:?}")]
    Cycle(Vec<TableName>),
}

/// Convenience alias for results returned by nesprisa crates.
pub type Result<T> = std::result::Result<T, Error>;
