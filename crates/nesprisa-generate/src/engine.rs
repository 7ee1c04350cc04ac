use std::time::Instant;

use chrono::NaiveDate;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use nesprisa_core::TableName;

use crate::errors::GenerationError;
use crate::faker_rs::{EARLIEST_DATE, FakeProvider, FakeRsAdapter};
use crate::foreign::SeedContext;
use crate::generators::GeneratorContext;
use crate::model::{SeedOptions, SeedReport, TableReport};
use crate::planner::{GenerationTask, plan_tables};
use crate::registry::TableRegistry;
use crate::store::RowStore;

/// Receives per-table progress while a run is in flight.
pub trait ProgressSink: Send + Sync {
    fn table_started(&self, table: TableName, rows: usize);
    fn table_finished(&self, report: &TableReport);
}

/// Progress sink that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn table_started(&self, _table: TableName, _rows: usize) {}

    fn table_finished(&self, _report: &TableReport) {}
}

/// Result of a committed run.
#[derive(Debug, Clone)]
pub struct SeedOutcome {
    pub report: SeedReport,
    /// Rows of every seeded table, as persisted.
    pub context: SeedContext,
}

/// Seeds tables in dependency order into a [`RowStore`].
pub struct SeedEngine {
    options: SeedOptions,
    registry: TableRegistry,
    faker: Box<dyn FakeProvider>,
}

impl SeedEngine {
    pub fn new(options: SeedOptions, registry: TableRegistry) -> Self {
        Self {
            options,
            registry,
            faker: Box::new(FakeRsAdapter::default()),
        }
    }

    pub fn with_faker(mut self, faker: Box<dyn FakeProvider>) -> Self {
        self.faker = faker;
        self
    }

    pub fn options(&self) -> &SeedOptions {
        &self.options
    }

    pub fn registry(&self) -> &TableRegistry {
        &self.registry
    }

    /// Tables the run would seed, in order, with their row counts.
    pub fn plan(&self) -> Result<Vec<GenerationTask>, GenerationError> {
        plan_tables(
            &self.registry,
            self.options.targets.as_deref(),
            self.options.auto_generate_parents,
        )
    }

    /// Generates and persists every planned table inside one unit of work.
    ///
    /// The first error rolls the store back and is returned; nothing from a
    /// failed run is committed.
    pub async fn run(
        &self,
        store: &mut dyn RowStore,
        progress: &dyn ProgressSink,
    ) -> Result<SeedOutcome, GenerationError> {
        let start = Instant::now();
        if self.options.max_attempts_row == 0 {
            return Err(GenerationError::InvalidOptions(
                "max_attempts_row must be at least 1".to_string(),
            ));
        }
        let tasks = self.plan()?;
        let seed = self.options.seed.unwrap_or_else(rand::random);
        let base_date = self
            .options
            .base_date
            .unwrap_or_else(|| chrono::Local::now().date_naive());
        if base_date < EARLIEST_DATE {
            return Err(GenerationError::InvalidOptions(format!(
                "base_date {base_date} is before {EARLIEST_DATE}"
            )));
        }
        let run_id = uuid::Uuid::new_v4().to_string();
        let mut report = SeedReport::new(run_id.clone(), seed, base_date);

        info!(
            run_id = %run_id,
            tables = tasks.len(),
            seed,
            base_date = %base_date,
            locale = %self.faker.locale(),
            "seeding started"
        );

        store.begin(&run_id).await?;

        let seeded = self
            .seed_tables(&tasks, store, progress, seed, base_date, &mut report)
            .await;
        let context = match seeded {
            Ok(context) => context,
            Err(err) => {
                warn!(run_id = %run_id, error = %err, "seeding failed, rolling back");
                rollback(store, &run_id).await;
                return Err(err);
            }
        };

        if let Err(err) = store.commit().await {
            warn!(run_id = %run_id, error = %err, "commit failed, rolling back");
            rollback(store, &run_id).await;
            return Err(err.into());
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            run_id = %run_id,
            tables = report.tables.len(),
            rows_total = report.rows_total,
            duration_ms = report.duration_ms,
            "seeding completed"
        );

        Ok(SeedOutcome { report, context })
    }

    async fn seed_tables(
        &self,
        tasks: &[GenerationTask],
        store: &mut dyn RowStore,
        progress: &dyn ProgressSink,
        seed: u64,
        base_date: NaiveDate,
        report: &mut SeedReport,
    ) -> Result<SeedContext, GenerationError> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut context = SeedContext::new();

        for task in tasks {
            let table_start = Instant::now();
            progress.table_started(task.table, task.rows);
            info!(table = %task.table, rows = task.rows, "generating table");

            let rows = {
                let mut ctx = GeneratorContext::new(
                    task.table,
                    &mut rng,
                    self.faker.as_ref(),
                    base_date,
                    self.options.max_attempts_row,
                );
                self.registry
                    .generate(task.table, &context, task.rows, &mut ctx)?
            };
            let rows = store.persist(rows).await?;

            let table_report = TableReport {
                table: task.table,
                rows_requested: task.rows,
                rows_generated: rows.len(),
                duration_ms: table_start.elapsed().as_millis() as u64,
            };
            context.ingest_table(rows)?;

            info!(
                table = %task.table,
                rows_generated = table_report.rows_generated,
                duration_ms = table_report.duration_ms,
                "table seeded"
            );
            progress.table_finished(&table_report);
            report.record_table(table_report);
        }

        Ok(context)
    }
}

async fn rollback(store: &mut dyn RowStore, run_id: &str) {
    if let Err(err) = store.rollback().await {
        warn!(run_id = %run_id, error = %err, "rollback failed");
    }
}
