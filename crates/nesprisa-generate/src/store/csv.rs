use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use nesprisa_core::TableRows;

use super::{IdSequences, RowStore, StoreError};
use crate::output::csv::write_table_csv;

/// Writes one `<table>.csv` per batch into a run directory under `out_dir`.
///
/// Files are staged in a hidden directory and only moved to
/// `<timestamp>__run_<run_id>` on commit.
#[derive(Debug)]
pub struct CsvStore {
    out_dir: PathBuf,
    staging: Option<Staging>,
    sequences: IdSequences,
    run_dir: Option<PathBuf>,
    bytes_written: u64,
}

#[derive(Debug)]
struct Staging {
    run_id: String,
    dir: PathBuf,
}

impl CsvStore {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            staging: None,
            sequences: IdSequences::new(),
            run_dir: None,
            bytes_written: 0,
        }
    }

    /// Directory of the last committed run.
    pub fn run_dir(&self) -> Option<&Path> {
        self.run_dir.as_deref()
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    fn staging(&self) -> Result<&Staging, StoreError> {
        self.staging
            .as_ref()
            .ok_or_else(|| StoreError::State("no open run".to_string()))
    }
}

#[async_trait]
impl RowStore for CsvStore {
    async fn begin(&mut self, run_id: &str) -> Result<(), StoreError> {
        if let Some(staging) = &self.staging {
            return Err(StoreError::State(format!(
                "run '{}' is still open",
                staging.run_id
            )));
        }
        let dir = self.out_dir.join(format!(".staging-{run_id}"));
        std::fs::create_dir_all(&dir)?;
        self.staging = Some(Staging {
            run_id: run_id.to_string(),
            dir,
        });
        Ok(())
    }

    async fn persist(&mut self, mut rows: TableRows) -> Result<TableRows, StoreError> {
        let path = self.staging()?.dir.join(format!("{}.csv", rows.table()));
        self.sequences.assign(&mut rows);
        let bytes = write_table_csv(&path, &rows)?;
        self.bytes_written = self.bytes_written.saturating_add(bytes);
        debug!(table = %rows.table(), path = %path.display(), bytes, "table written");
        Ok(rows)
    }

    async fn commit(&mut self) -> Result<(), StoreError> {
        let staging = self
            .staging
            .take()
            .ok_or_else(|| StoreError::State("no open run".to_string()))?;
        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%SZ").to_string();
        let run_dir = self
            .out_dir
            .join(format!("{timestamp}__run_{}", staging.run_id));
        std::fs::rename(&staging.dir, &run_dir)?;
        self.run_dir = Some(run_dir);
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), StoreError> {
        if let Some(staging) = self.staging.take() {
            if staging.dir.exists() {
                std::fs::remove_dir_all(&staging.dir)?;
            }
        }
        Ok(())
    }
}
