//! Constraint-aware row generation for the nesprisa schema.
//!
//! Generators draw foreign keys from parent pools of already persisted rows,
//! track composite keys so no tuple repeats within a run, and hand each batch
//! to a [`store::RowStore`] before dependent tables are generated.

pub mod engine;
pub mod errors;
pub mod faker_rs;
pub mod foreign;
pub mod generators;
pub mod model;
pub mod output;
pub mod planner;
pub mod registry;
pub mod store;
pub mod unique;

pub use engine::{NoProgress, ProgressSink, SeedEngine, SeedOutcome};
pub use errors::GenerationError;
pub use foreign::SeedContext;
pub use model::{SeedOptions, SeedReport, TableReport};
pub use registry::TableRegistry;
