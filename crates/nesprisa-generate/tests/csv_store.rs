use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;

use nesprisa_core::TableName;
use nesprisa_generate::store::CsvStore;
use nesprisa_generate::{NoProgress, SeedEngine, SeedOptions, TableRegistry};

fn temp_out_dir(label: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!("nesprisa_csv_{label}_{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create temp out dir");
    dir
}

fn options() -> SeedOptions {
    SeedOptions {
        seed: Some(99),
        base_date: Some(NaiveDate::from_ymd_opt(2023, 10, 1).expect("valid date")),
        ..SeedOptions::default()
    }
}

#[tokio::test]
async fn committed_run_has_one_csv_per_table() {
    let out_dir = temp_out_dir("commit");
    let engine = SeedEngine::new(options(), TableRegistry::new(4));
    let mut store = CsvStore::new(&out_dir);

    let outcome = engine
        .run(&mut store, &NoProgress)
        .await
        .expect("seed run");

    let run_dir = store.run_dir().expect("run dir after commit").to_path_buf();
    assert!(
        run_dir
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(&format!("__run_{}", outcome.report.run_id)))
    );
    assert!(store.bytes_written() > 0);

    for table in TableName::ALL {
        let contents =
            fs::read_to_string(run_dir.join(format!("{table}.csv"))).expect("read table csv");
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 5, "{table}: header plus four rows");
    }

    let carrito = fs::read_to_string(run_dir.join("carrito.csv")).expect("read carrito.csv");
    let mut lines = carrito.lines();
    assert_eq!(lines.next(), Some("id_tienda,id_carrito,fecha,dni_cliente"));
    let ids: Vec<&str> = lines
        .map(|line| line.split(',').nth(1).unwrap_or_default())
        .collect();
    assert_eq!(ids, vec!["1", "2", "3", "4"]);

    let leftovers: Vec<_> = fs::read_dir(&out_dir)
        .expect("list out dir")
        .filter_map(Result::ok)
        .filter(|entry| entry.file_name().to_string_lossy().starts_with(".staging-"))
        .collect();
    assert!(leftovers.is_empty());
}

#[tokio::test]
async fn failed_run_leaves_no_files() {
    let out_dir = temp_out_dir("rollback");
    let mut registry = TableRegistry::new(2);
    registry
        .set_rows(TableName::TieneCafetera, 5)
        .expect("tiene_cafetera registered");
    let engine = SeedEngine::new(options(), registry);
    let mut store = CsvStore::new(&out_dir);

    engine
        .run(&mut store, &NoProgress)
        .await
        .expect_err("2 x 2 owners cannot hold 5 rows");

    assert!(store.run_dir().is_none());
    let entries = fs::read_dir(&out_dir).expect("list out dir").count();
    assert_eq!(entries, 0);
}
