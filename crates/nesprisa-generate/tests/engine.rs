use std::collections::HashSet;

use chrono::NaiveDate;

use nesprisa_core::{Carrito, Contiene, TableName};
use nesprisa_generate::store::{MemoryStore, RowStore};
use nesprisa_generate::{GenerationError, NoProgress, SeedEngine, SeedOptions, TableRegistry};

fn options(seed: u64) -> SeedOptions {
    SeedOptions {
        seed: Some(seed),
        base_date: Some(NaiveDate::from_ymd_opt(2024, 1, 31).expect("valid date")),
        ..SeedOptions::default()
    }
}

#[tokio::test]
async fn full_run_commits_every_table() {
    let engine = SeedEngine::new(options(42), TableRegistry::new(3));
    let mut store = MemoryStore::new();

    let outcome = engine
        .run(&mut store, &NoProgress)
        .await
        .expect("seed run");

    assert_eq!(outcome.report.seed, 42);
    assert_eq!(outcome.report.tables.len(), TableName::ALL.len());
    assert_eq!(outcome.report.rows_total, 3 * TableName::ALL.len());
    for table in TableName::ALL {
        assert_eq!(store.committed_rows(table), 3, "{table} rows");
        assert_eq!(outcome.context.row_count(table), 3);
    }
    assert!(!store.in_transaction());

    let carritos = outcome
        .context
        .pool::<Carrito>()
        .expect("carrito pool");
    let ids: HashSet<i64> = carritos
        .iter()
        .map(|c| c.id_carrito.expect("persisted id"))
        .collect();
    assert_eq!(ids, HashSet::from([1, 2, 3]));

    let lineas = outcome.context.pool::<Contiene>().expect("contiene pool");
    for linea in lineas {
        assert!(carritos.iter().any(|c| {
            c.id_carrito == Some(linea.id_carrito) && c.id_tienda == linea.id_tienda
        }));
    }
}

#[tokio::test]
async fn exhaustion_rolls_back_the_whole_run() {
    let mut registry = TableRegistry::new(3);
    registry
        .set_rows(TableName::Receta, 10)
        .expect("receta registered");
    let engine = SeedEngine::new(options(42), registry);
    let mut store = MemoryStore::new();

    let err = engine
        .run(&mut store, &NoProgress)
        .await
        .expect_err("3 x 3 recetas cannot hold 10 rows");

    assert!(matches!(
        err,
        GenerationError::Exhaustion {
            table: TableName::Receta,
            requested: 10,
            available: 9,
        }
    ));
    assert_eq!(store.total_committed_rows(), 0);
    assert!(!store.in_transaction());
}

#[tokio::test]
async fn seeded_runs_are_reproducible() {
    let engine = SeedEngine::new(options(7), TableRegistry::new(5));

    let mut store_a = MemoryStore::new();
    let first = engine
        .run(&mut store_a, &NoProgress)
        .await
        .expect("run A");
    let mut store_b = MemoryStore::new();
    let second = engine
        .run(&mut store_b, &NoProgress)
        .await
        .expect("run B");

    assert_ne!(first.report.run_id, second.report.run_id);
    for table in TableName::ALL {
        assert_eq!(
            first.context.rows(table),
            second.context.rows(table),
            "{table} should be identical"
        );
    }
}

#[tokio::test]
async fn targets_seed_only_the_needed_tables() {
    let engine = SeedEngine::new(
        SeedOptions {
            targets: Some(vec![TableName::VarEnCafetera]),
            ..options(3)
        },
        TableRegistry::new(2),
    );
    let mut store = MemoryStore::new();

    let outcome = engine
        .run(&mut store, &NoProgress)
        .await
        .expect("seed run");

    let seeded: Vec<TableName> = outcome.report.tables.iter().map(|t| t.table).collect();
    assert_eq!(
        seeded,
        vec![
            TableName::Variedad,
            TableName::Cafetera,
            TableName::VarEnCafetera,
        ]
    );
    assert_eq!(store.committed_rows(TableName::Pais), 0);
}

#[tokio::test]
async fn unregistered_tables_fail_before_anything_is_persisted() {
    let engine = SeedEngine::new(
        SeedOptions {
            targets: Some(vec![TableName::Pais]),
            ..options(1)
        },
        TableRegistry::empty(),
    );
    let mut store = MemoryStore::new();

    let err = engine
        .run(&mut store, &NoProgress)
        .await
        .expect_err("empty registry");
    assert!(matches!(err, GenerationError::UnknownTable(name) if name == "pais"));
    assert!(!store.in_transaction());
}

#[tokio::test]
async fn zero_attempts_is_rejected() {
    let engine = SeedEngine::new(
        SeedOptions {
            max_attempts_row: 0,
            ..options(1)
        },
        TableRegistry::new(1),
    );
    let mut store = MemoryStore::new();

    let err = engine
        .run(&mut store, &NoProgress)
        .await
        .expect_err("invalid options");
    assert!(matches!(err, GenerationError::InvalidOptions(_)));
}

#[tokio::test]
async fn base_dates_before_1970_are_rejected() {
    let engine = SeedEngine::new(
        SeedOptions {
            base_date: NaiveDate::from_ymd_opt(1960, 1, 1),
            ..options(1)
        },
        TableRegistry::new(1),
    );
    let mut store = MemoryStore::new();

    let err = engine
        .run(&mut store, &NoProgress)
        .await
        .expect_err("base date before the earliest date");
    assert!(matches!(err, GenerationError::InvalidOptions(_)));
    assert!(!store.in_transaction());
    assert_eq!(store.total_committed_rows(), 0);
}

#[tokio::test]
async fn memory_store_requires_an_open_run() {
    let mut store = MemoryStore::new();
    let rows = nesprisa_core::TableRows::from(Vec::<nesprisa_core::Pais>::new());
    assert!(store.persist(rows).await.is_err());
    assert!(store.commit().await.is_err());

    store.begin("a").await.expect("begin");
    assert!(store.begin("b").await.is_err());
    store.rollback().await.expect("rollback");
}
