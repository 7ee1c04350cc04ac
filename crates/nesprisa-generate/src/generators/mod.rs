//! Per-table row generators.
//!
//! Every table has a unit generator registered in the [`TableRegistry`].
//! Dependent tables declare an explicit input struct naming the parent pools
//! they read; the generator resolves it from the [`SeedContext`] and hands it
//! to a plain function that builds the batch.

pub mod brewer;
pub mod catalog;
pub mod fields;
pub mod origin;
pub mod retail;

use chrono::NaiveDate;
use rand_chacha::ChaCha8Rng;

use nesprisa_core::{Record, TableName, TableRows};

use crate::errors::GenerationError;
use crate::faker_rs::FakeProvider;
use crate::foreign::SeedContext;
use crate::registry::TableRegistry;
use crate::unique::UniquenessTracker;

/// Generates the rows of one table.
pub trait TableGenerator: Send + Sync {
    fn table(&self) -> TableName;

    /// Builds exactly `count` rows from the parent pools in `pools`.
    fn generate(
        &self,
        pools: &SeedContext,
        count: usize,
        ctx: &mut GeneratorContext<'_>,
    ) -> Result<TableRows, GenerationError>;
}

/// Randomness, fake values and limits available to a generator call.
pub struct GeneratorContext<'a> {
    pub table: TableName,
    pub rng: &'a mut ChaCha8Rng,
    pub faker: &'a dyn FakeProvider,
    pub base_date: NaiveDate,
    pub max_attempts_row: u32,
}

impl<'a> GeneratorContext<'a> {
    pub fn new(
        table: TableName,
        rng: &'a mut ChaCha8Rng,
        faker: &'a dyn FakeProvider,
        base_date: NaiveDate,
        max_attempts_row: u32,
    ) -> Self {
        Self {
            table,
            rng,
            faker,
            base_date,
            max_attempts_row,
        }
    }

    /// Unused short identifier for this batch.
    pub fn claim_short_id(
        &mut self,
        ids: &mut UniquenessTracker<String>,
        requested: usize,
    ) -> Result<String, GenerationError> {
        let rng = &mut *self.rng;
        ids.claim_with(self.table, requested, self.max_attempts_row, || {
            fields::short_id(&mut *rng)
        })
    }

    /// Unused DNI for this batch.
    pub fn claim_dni(
        &mut self,
        ids: &mut UniquenessTracker<String>,
        requested: usize,
    ) -> Result<String, GenerationError> {
        let rng = &mut *self.rng;
        ids.claim_with(self.table, requested, self.max_attempts_row, || {
            fields::dni(&mut *rng)
        })
    }

    /// Random calendar date up to the base date.
    pub fn date(&mut self) -> NaiveDate {
        self.faker.date(&mut *self.rng, self.base_date)
    }

    /// Start and end of a one to eight week window.
    pub fn date_window(&mut self) -> (NaiveDate, NaiveDate) {
        let start = self.date();
        let end = fields::window_end(start, &mut *self.rng);
        (start, end)
    }

    pub fn text(&mut self, max_chars: usize) -> String {
        self.faker.text(&mut *self.rng, max_chars)
    }

    pub fn word(&mut self) -> String {
        self.faker.word(&mut *self.rng)
    }

    pub fn person_name(&mut self) -> String {
        self.faker.person_name(&mut *self.rng)
    }

    pub fn address(&mut self, max_chars: usize) -> String {
        fields::truncate(&self.faker.address(&mut *self.rng), max_chars)
    }

    pub fn pick<'p, T>(&mut self, pool: &'p [T]) -> &'p T {
        fields::pick(pool, &mut *self.rng)
    }
}

/// Fails with `MissingDependency` when a parent pool handed to `table` is empty.
pub fn ensure_pool<T: Record>(table: TableName, rows: &[T]) -> Result<(), GenerationError> {
    if rows.is_empty() {
        return Err(GenerationError::MissingDependency {
            table,
            dependency: T::TABLE,
        });
    }
    Ok(())
}

/// Implements [`TableGenerator`] for a unit struct on top of a build function.
///
/// With an input type the pools are resolved from the context first;
/// without one the table has no parents.
macro_rules! table_generator {
    ($generator:ident, $table:ident, $build:path) => {
        pub struct $generator;

        impl $crate::generators::TableGenerator for $generator {
            fn table(&self) -> nesprisa_core::TableName {
                nesprisa_core::TableName::$table
            }

            fn generate(
                &self,
                _pools: &$crate::foreign::SeedContext,
                count: usize,
                ctx: &mut $crate::generators::GeneratorContext<'_>,
            ) -> Result<nesprisa_core::TableRows, $crate::errors::GenerationError> {
                Ok($build(count, ctx)?.into())
            }
        }
    };
    ($generator:ident, $table:ident, $input:ident, $build:path) => {
        pub struct $generator;

        impl $crate::generators::TableGenerator for $generator {
            fn table(&self) -> nesprisa_core::TableName {
                nesprisa_core::TableName::$table
            }

            fn generate(
                &self,
                pools: &$crate::foreign::SeedContext,
                count: usize,
                ctx: &mut $crate::generators::GeneratorContext<'_>,
            ) -> Result<nesprisa_core::TableRows, $crate::errors::GenerationError> {
                let input = $input::resolve(pools)?;
                Ok($build(&input, count, ctx)?.into())
            }
        }
    };
}

pub(crate) use table_generator;

/// Registers one generator per table with `rows` rows each.
pub fn register_all(registry: &mut TableRegistry, rows: usize) {
    origin::register(registry, rows);
    catalog::register(registry, rows);
    retail::register(registry, rows);
    brewer::register(registry, rows);
}
