use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgPool};
use sqlx::query::Query;
use sqlx::{Postgres, Row, Transaction};
use tracing::{debug, info};

use nesprisa_core::{FieldValue, TableRows};
use nesprisa_generate::store::{RowStore, StoreError};

use crate::schema::create_schema;

/// Persists every batch of a run inside one PostgreSQL transaction.
///
/// Generated columns are left to the database and read back with
/// `RETURNING`, so `carrito.id_carrito` comes from its sequence.
pub struct PostgresStore {
    pool: PgPool,
    create_schema: bool,
    tx: Option<Transaction<'static, Postgres>>,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            create_schema: false,
            tx: None,
        }
    }

    /// Creates missing tables when the run begins.
    pub fn with_schema_creation(mut self, enabled: bool) -> Self {
        self.create_schema = enabled;
        self
    }

    fn transaction(&mut self) -> Result<&mut Transaction<'static, Postgres>, StoreError> {
        self.tx
            .as_mut()
            .ok_or_else(|| StoreError::State("no open transaction".to_string()))
    }
}

#[async_trait]
impl RowStore for PostgresStore {
    async fn begin(&mut self, run_id: &str) -> Result<(), StoreError> {
        if self.tx.is_some() {
            return Err(StoreError::State("a transaction is already open".to_string()));
        }
        let mut tx = self.pool.begin().await.map_err(database_error)?;
        if self.create_schema {
            create_schema(&mut tx).await.map_err(database_error)?;
            info!(run_id = %run_id, "schema ensured");
        }
        self.tx = Some(tx);
        Ok(())
    }

    async fn persist(&mut self, mut rows: TableRows) -> Result<TableRows, StoreError> {
        let table = rows.table();
        let generated = rows.generated_column();
        let columns: Vec<&str> = rows
            .columns()
            .iter()
            .copied()
            .filter(|column| Some(*column) != generated)
            .collect();
        let sql = insert_statement(table.as_str(), &columns, generated);
        let generated_index = generated.and_then(|g| rows.columns().iter().position(|c| *c == g));

        let tx = self.transaction()?;
        for (index, values) in rows.value_rows().into_iter().enumerate() {
            let mut query = sqlx::query(&sql);
            for (position, value) in values.into_iter().enumerate() {
                if Some(position) == generated_index {
                    continue;
                }
                query = bind_value(query, value);
            }

            if generated.is_some() {
                let row = query.fetch_one(&mut **tx).await.map_err(database_error)?;
                let id: i64 = row.try_get(0).map_err(database_error)?;
                rows.assign_generated(index, id);
            } else {
                query.execute(&mut **tx).await.map_err(database_error)?;
            }
        }

        debug!(table = %table, rows = rows.len(), "batch inserted");
        Ok(rows)
    }

    async fn commit(&mut self) -> Result<(), StoreError> {
        let tx = self
            .tx
            .take()
            .ok_or_else(|| StoreError::State("no open transaction".to_string()))?;
        tx.commit().await.map_err(database_error)
    }

    async fn rollback(&mut self) -> Result<(), StoreError> {
        match self.tx.take() {
            Some(tx) => tx.rollback().await.map_err(database_error),
            None => Ok(()),
        }
    }
}

fn insert_statement(table: &str, columns: &[&str], returning: Option<&str>) -> String {
    let placeholders: Vec<String> = (1..=columns.len()).map(|idx| format!("${idx}")).collect();
    let mut sql = format!(
        "INSERT INTO {table} ({}) VALUES ({})",
        columns.join(", "),
        placeholders.join(", ")
    );
    if let Some(column) = returning {
        sql.push_str(&format!(" RETURNING {column}"));
    }
    sql
}

/// Nulls only occur in text columns, so they are bound as text.
fn bind_value(
    query: Query<'_, Postgres, PgArguments>,
    value: FieldValue,
) -> Query<'_, Postgres, PgArguments> {
    match value {
        FieldValue::Null => query.bind(None::<String>),
        FieldValue::Int(value) => query.bind(value),
        FieldValue::Float(value) => query.bind(value),
        FieldValue::Text(value) => query.bind(value),
        FieldValue::Date(value) => query.bind(value),
    }
}

fn database_error(err: sqlx::Error) -> StoreError {
    StoreError::Database(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_skips_and_returns_generated_column() {
        let sql = insert_statement(
            "carrito",
            &["id_tienda", "fecha", "dni_cliente"],
            Some("id_carrito"),
        );
        assert_eq!(
            sql,
            "INSERT INTO carrito (id_tienda, fecha, dni_cliente) VALUES ($1, $2, $3) RETURNING id_carrito"
        );
    }

    #[test]
    fn insert_without_generated_column() {
        let sql = insert_statement("pais", &["id_pais", "nombre"], None);
        assert_eq!(sql, "INSERT INTO pais (id_pais, nombre) VALUES ($1, $2)");
    }
}
