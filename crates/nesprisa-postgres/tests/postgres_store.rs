use anyhow::{Context, Result};
use chrono::NaiveDate;
use nesprisa_core::TableName;
use nesprisa_generate::{NoProgress, SeedEngine, SeedOptions, TableRegistry};
use nesprisa_postgres::{PostgresStore, drop_schema};
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::env;

/// Connects to `TEST_DATABASE_URL`; tests are skipped when it is unset.
async fn test_pool() -> Result<Option<PgPool>> {
    let Ok(url) = env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return Ok(None);
    };
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .acquire_timeout(std::time::Duration::from_secs(10))
        .connect(&url)
        .await
        .context("connecting to Postgres")?;
    Ok(Some(pool))
}

async fn count(pool: &PgPool, table: TableName) -> Result<i64> {
    let sql = format!("SELECT COUNT(*) FROM {table}");
    let count: i64 = sqlx::query_scalar(&sql)
        .fetch_one(pool)
        .await
        .with_context(|| format!("counting {table}"))?;
    Ok(count)
}

fn options(seed: u64) -> SeedOptions {
    SeedOptions {
        seed: Some(seed),
        base_date: NaiveDate::from_ymd_opt(2024, 2, 29),
        ..SeedOptions::default()
    }
}

// Both scenarios share one test so they never race on the same tables.
#[tokio::test]
async fn seeds_and_rolls_back_in_one_transaction() -> Result<()> {
    let Some(pool) = test_pool().await? else {
        return Ok(());
    };
    drop_schema(&pool).await.context("dropping schema")?;

    let engine = SeedEngine::new(options(5), TableRegistry::new(4));
    let mut store = PostgresStore::new(pool.clone()).with_schema_creation(true);
    let outcome = engine.run(&mut store, &NoProgress).await?;

    for table in TableName::ALL {
        assert_eq!(count(&pool, table).await?, 4, "{table}");
    }
    let carritos = outcome
        .context
        .pool::<nesprisa_core::Carrito>()
        .context("carrito pool")?;
    assert!(carritos.iter().all(|c| c.id_carrito.is_some()));

    let mut registry = TableRegistry::new(2);
    registry.set_rows(TableName::Receta, 5)?;
    let engine = SeedEngine::new(options(6), registry);
    let mut store = PostgresStore::new(pool.clone());
    let result = engine.run(&mut store, &NoProgress).await;
    assert!(result.is_err(), "2 x 2 recetas cannot hold 5 rows");

    for table in TableName::ALL {
        assert_eq!(count(&pool, table).await?, 4, "{table} after rollback");
    }

    // A later run may reuse a name an earlier run already stored.
    sqlx::query(
        "INSERT INTO variedad (id_variedad, denominacion, pvp10, intensidad, nivel_cafeina)
         SELECT 'reused000000000', denominacion, pvp10, intensidad, nivel_cafeina
         FROM variedad LIMIT 1",
    )
    .execute(&pool)
    .await
    .context("reusing a variedad name")?;
    assert_eq!(count(&pool, TableName::Variedad).await?, 5);

    drop_schema(&pool).await?;
    Ok(())
}
