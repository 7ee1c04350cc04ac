mod logging;
mod progress;
mod report;
mod settings;

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use nesprisa_core::{FkGraphReport, TableName, build_fk_graph_report};
use nesprisa_generate::faker_rs::{FakeRsAdapter, LocaleKey};
use nesprisa_generate::store::{CsvStore, MemoryStore};
use nesprisa_generate::{GenerationError, SeedEngine, SeedReport};
use nesprisa_postgres::{PostgresStore, redact_connection_string};
use progress::LogProgress;
use report::write_json_atomic;
use serde::Serialize;
use settings::{Overrides, SeedSettings, SettingsError};
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

#[derive(Debug, Error)]
enum CliError {
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("logging error: {0}")]
    Logging(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Parser, Debug)]
#[command(
    name = "nesprisa",
    version,
    about = "Seed the nesprisa schema with referentially consistent rows"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate rows for every table and persist them in one unit of work.
    Seed(SeedArgs),
    /// List tables in run order with their dependencies and row counts.
    Tables(TablesArgs),
}

#[derive(Args, Debug)]
struct SeedArgs {
    /// Rows for every table, replacing configured counts.
    #[arg(long)]
    rows: Option<usize>,
    /// Only seed these tables, comma separated.
    #[arg(long, value_name = "TABLE", value_delimiter = ',')]
    only: Vec<TableName>,
    /// Fail instead of adding the missing parents of --only tables.
    #[arg(long, default_value_t = false)]
    no_parents: bool,
    /// Seed for the random generator; printed after every run.
    #[arg(long)]
    seed: Option<u64>,
    /// Locale for fake values (en_US or pt_BR).
    #[arg(long)]
    locale: Option<LocaleKey>,
    /// Latest date generated values may take (YYYY-MM-DD), today by default.
    #[arg(long, value_name = "DATE")]
    base_date: Option<NaiveDate>,
    /// Attempts to find an unused identifier before a table counts as exhausted.
    #[arg(long)]
    max_attempts_row: Option<u32>,
    /// TOML settings file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// PostgreSQL connection string.
    #[arg(long, env = "DATABASE_URL", value_name = "URL")]
    database_url: Option<String>,
    /// Write CSV files into a run directory under DIR instead of a database.
    #[arg(long, value_name = "DIR")]
    out: Option<PathBuf>,
    /// Generate everything in memory without persisting.
    #[arg(long, default_value_t = false)]
    dry_run: bool,
    /// Create missing tables before seeding.
    #[arg(long, default_value_t = false)]
    create_schema: bool,
    /// Write the run report as JSON.
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,
    /// Append JSON logs to this file.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl SeedArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            rows: self.rows,
            only: self.only.clone(),
            no_parents: self.no_parents,
            seed: self.seed,
            locale: self.locale,
            base_date: self.base_date,
            max_attempts_row: self.max_attempts_row,
        }
    }
}

#[derive(Args, Debug)]
struct TablesArgs {
    /// TOML settings file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Rows for every table, replacing configured counts.
    #[arg(long)]
    rows: Option<usize>,
    /// Print JSON instead of a table.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct TableEntry {
    table: TableName,
    rows: usize,
    dependencies: &'static [TableName],
}

#[derive(Debug, Serialize)]
struct TablesListing {
    tables: Vec<TableEntry>,
    graph: FkGraphReport,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Seed(args) => run_seed(args).await,
        Command::Tables(args) => run_tables(args),
    }
}

async fn run_seed(args: SeedArgs) -> Result<(), CliError> {
    let settings = SeedSettings::load_optional(args.config.as_deref())?;
    let log_file = args.log_file.clone().or_else(|| settings.log_file.clone());
    logging::init_logging(log_file.as_deref()).map_err(CliError::Logging)?;

    let overrides = args.overrides();
    let registry = settings.registry(&overrides)?;
    let options = settings.options(&overrides);
    let locale = settings.locale(&overrides);
    let engine = SeedEngine::new(options, registry).with_faker(Box::new(FakeRsAdapter::new(locale)));
    let progress = LogProgress::new(engine.plan()?.len());

    let report = if args.dry_run {
        tracing::info!(event = "store_selected", store = "memory");
        let mut store = MemoryStore::new();
        engine.run(&mut store, &progress).await?.report
    } else if let Some(out) = &args.out {
        tracing::info!(event = "store_selected", store = "csv", out = %out.display());
        let mut store = CsvStore::new(out);
        let report = engine.run(&mut store, &progress).await?.report;
        if let Some(run_dir) = store.run_dir() {
            let path = run_dir.join("seed_report.json");
            write_json_atomic(&path, &report)?;
            tracing::info!(event = "csv_written", path = %run_dir.display(), bytes = store.bytes_written());
        }
        report
    } else if let Some(url) = &args.database_url {
        tracing::info!(
            event = "store_selected",
            store = "postgres",
            database = %redact_connection_string(url)
        );
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(10))
            .connect(url)
            .await?;
        let mut store = PostgresStore::new(pool.clone()).with_schema_creation(args.create_schema);
        let outcome = engine.run(&mut store, &progress).await;
        pool.close().await;
        outcome?.report
    } else {
        return Err(CliError::InvalidConfig(
            "choose a destination: --database-url, --out or --dry-run".to_string(),
        ));
    };

    if let Some(path) = &args.report {
        write_json_atomic(path, &report)?;
        tracing::info!(event = "report_written", path = %path.display());
    }

    finish(&report);
    Ok(())
}

fn finish(report: &SeedReport) {
    tracing::info!(
        event = "run_finished",
        run_id = %report.run_id,
        tables = report.tables.len(),
        rows_total = report.rows_total,
        duration_ms = report.duration_ms,
        "replay with --seed {} --base-date {}",
        report.seed,
        report.base_date
    );
}

fn run_tables(args: TablesArgs) -> Result<(), CliError> {
    let settings = SeedSettings::load_optional(args.config.as_deref())?;
    let overrides = Overrides {
        rows: args.rows,
        ..Overrides::default()
    };
    let registry = settings.registry(&overrides)?;

    let order: Vec<TableName> = registry.tables().collect();
    let graph = build_fk_graph_report(&order);
    let mut tables = Vec::with_capacity(order.len());
    for table in order {
        tables.push(TableEntry {
            table,
            rows: registry.rows_for(table)?,
            dependencies: table.dependencies(),
        });
    }

    if args.json {
        let listing = TablesListing { tables, graph };
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    for (idx, entry) in tables.iter().enumerate() {
        let dependencies: Vec<&str> = entry.dependencies.iter().map(|t| t.as_str()).collect();
        let dependencies = if dependencies.is_empty() {
            "-".to_string()
        } else {
            dependencies.join(", ")
        };
        println!(
            "{:>2}  {:<24} {:>6}  {}",
            idx + 1,
            entry.table.as_str(),
            entry.rows,
            dependencies
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_seed_flags() {
        let cli = Cli::try_parse_from([
            "nesprisa",
            "seed",
            "--rows",
            "25",
            "--only",
            "contiene,receta",
            "--seed",
            "9",
            "--locale",
            "pt_BR",
            "--base-date",
            "2024-03-01",
            "--dry-run",
        ])
        .unwrap();

        let Command::Seed(args) = cli.command else {
            panic!("expected seed command");
        };
        assert_eq!(args.rows, Some(25));
        assert_eq!(args.only, vec![TableName::Contiene, TableName::Receta]);
        assert_eq!(args.seed, Some(9));
        assert_eq!(args.locale, Some(LocaleKey::PtBr));
        assert_eq!(args.base_date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert!(args.dry_run);
    }

    #[test]
    fn rejects_unknown_tables() {
        assert!(Cli::try_parse_from(["nesprisa", "seed", "--only", "cafeteria"]).is_err());
    }
}
