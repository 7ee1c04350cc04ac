//! PostgreSQL persistence for seeding runs.

pub mod redaction;
pub mod schema;
pub mod store;

pub use redaction::redact_connection_string;
pub use schema::{create_schema, drop_schema};
pub use store::PostgresStore;
