use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use nesprisa_core::TableName;

/// Options for the seeding engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedOptions {
    /// Seed for the run's random generator; a fresh one is drawn when unset.
    pub seed: Option<u64>,
    /// Upper bound for random calendar dates; today when unset.
    pub base_date: Option<NaiveDate>,
    /// Maximum attempts to produce an unused identifier for a single row.
    pub max_attempts_row: u32,
    /// Restrict the run to these tables.
    pub targets: Option<Vec<TableName>>,
    /// Add missing parent tables of `targets` to the run.
    pub auto_generate_parents: bool,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            seed: None,
            base_date: None,
            max_attempts_row: 50,
            targets: None,
            auto_generate_parents: true,
        }
    }
}

/// Summary of a generated table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableReport {
    pub table: TableName,
    pub rows_requested: usize,
    pub rows_generated: usize,
    pub duration_ms: u64,
}

/// Report for a seeding run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedReport {
    pub run_id: String,
    pub seed: u64,
    pub base_date: NaiveDate,
    pub tables: Vec<TableReport>,
    pub rows_total: usize,
    pub duration_ms: u64,
}

impl SeedReport {
    pub fn new(run_id: String, seed: u64, base_date: NaiveDate) -> Self {
        Self {
            run_id,
            seed,
            base_date,
            tables: Vec::new(),
            rows_total: 0,
            duration_ms: 0,
        }
    }

    pub fn record_table(&mut self, report: TableReport) {
        self.rows_total += report.rows_generated;
        self.tables.push(report);
    }
}
