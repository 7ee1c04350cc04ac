use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::info;

use nesprisa_core::TableName;
use nesprisa_generate::{ProgressSink, TableReport};

/// Reports table progress as `[n/total]` log lines.
pub struct LogProgress {
    total: usize,
    started: AtomicUsize,
}

impl LogProgress {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            started: AtomicUsize::new(0),
        }
    }
}

impl ProgressSink for LogProgress {
    fn table_started(&self, table: TableName, rows: usize) {
        let position = self.started.fetch_add(1, Ordering::Relaxed) + 1;
        info!(
            event = "table_started",
            table = %table,
            rows,
            "[{position}/{}] {table}",
            self.total
        );
    }

    fn table_finished(&self, report: &TableReport) {
        info!(
            event = "table_finished",
            table = %report.table,
            rows = report.rows_generated,
            duration_ms = report.duration_ms,
            "table finished"
        );
    }
}
