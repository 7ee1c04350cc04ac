use sqlx::{PgConnection, PgPool};

/// `CREATE TABLE` statements in dependency order.
///
/// `oferta` is keyed by (id_variedad, fecha_inicio) and `tiene_cafetera`
/// includes the owner in its key, so one variety can have several offers
/// and one machine model several owners.
pub const CREATE_TABLES: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS pais (
        id_pais VARCHAR(15) PRIMARY KEY,
        nombre TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS region (
        id_pais VARCHAR(15) NOT NULL REFERENCES pais (id_pais),
        id_region VARCHAR(15) NOT NULL,
        nombre TEXT NOT NULL,
        PRIMARY KEY (id_pais, id_region)
    )",
    "CREATE TABLE IF NOT EXISTS responsable_plantacion (
        dni_responsable VARCHAR(9) PRIMARY KEY,
        nombre_responsable TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS plantacion (
        id_pais VARCHAR(15) NOT NULL,
        id_region VARCHAR(15) NOT NULL,
        id_plantacion VARCHAR(15) NOT NULL,
        direccion VARCHAR(100) NOT NULL,
        dni_responsable VARCHAR(9) NOT NULL REFERENCES responsable_plantacion (dni_responsable),
        PRIMARY KEY (id_pais, id_region, id_plantacion),
        FOREIGN KEY (id_pais, id_region) REFERENCES region (id_pais, id_region)
    )",
    "CREATE TABLE IF NOT EXISTS tipo_grano (
        id_tipo_grano VARCHAR(15) PRIMARY KEY,
        descripcion VARCHAR(100) NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS grano_en_plantacion (
        id_pais VARCHAR(15) NOT NULL,
        id_region VARCHAR(15) NOT NULL,
        id_plantacion VARCHAR(15) NOT NULL,
        id_tipo_grano VARCHAR(15) NOT NULL REFERENCES tipo_grano (id_tipo_grano),
        PRIMARY KEY (id_pais, id_region, id_plantacion, id_tipo_grano),
        FOREIGN KEY (id_pais, id_region, id_plantacion)
            REFERENCES plantacion (id_pais, id_region, id_plantacion)
    )",
    "CREATE TABLE IF NOT EXISTS variedad (
        id_variedad VARCHAR(15) PRIMARY KEY,
        denominacion TEXT NOT NULL,
        pvp10 DOUBLE PRECISION NOT NULL,
        intensidad BIGINT NOT NULL CHECK (intensidad BETWEEN 0 AND 10),
        nivel_cafeina TEXT CHECK (nivel_cafeina IN ('bajo', 'medio', 'alto'))
    )",
    "CREATE TABLE IF NOT EXISTS variedad_especial (
        id_variedad VARCHAR(15) PRIMARY KEY REFERENCES variedad (id_variedad),
        descripcion_envase VARCHAR(100) NOT NULL,
        fecha_inicio_disponibilidad DATE NOT NULL,
        fecha_fin_disponibilidad DATE NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS oferta (
        id_variedad VARCHAR(15) NOT NULL REFERENCES variedad (id_variedad),
        fecha_inicio DATE NOT NULL,
        fecha_fin DATE NOT NULL,
        descuento DOUBLE PRECISION NOT NULL,
        fidelidad TEXT CHECK (fidelidad IN ('I', 'II', 'III')),
        PRIMARY KEY (id_variedad, fecha_inicio)
    )",
    "CREATE TABLE IF NOT EXISTS aditivo (
        id_aditivo VARCHAR(15) PRIMARY KEY,
        descripcion VARCHAR(100) NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS anyadir (
        id_aditivo VARCHAR(15) NOT NULL REFERENCES aditivo (id_aditivo),
        id_variedad VARCHAR(15) NOT NULL REFERENCES variedad (id_variedad),
        cantidad DOUBLE PRECISION NOT NULL,
        PRIMARY KEY (id_aditivo, id_variedad)
    )",
    "CREATE TABLE IF NOT EXISTS tienda (
        id_tienda VARCHAR(15) PRIMARY KEY,
        direccion VARCHAR(30) NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS cliente (
        dni VARCHAR(9) PRIMARY KEY,
        nombre TEXT NOT NULL,
        telefono TEXT,
        email TEXT NOT NULL,
        fecha DATE NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS carrito (
        id_tienda VARCHAR(15) NOT NULL REFERENCES tienda (id_tienda),
        id_carrito BIGSERIAL NOT NULL,
        fecha DATE NOT NULL,
        dni_cliente VARCHAR(9) NOT NULL REFERENCES cliente (dni),
        PRIMARY KEY (id_tienda, id_carrito)
    )",
    "CREATE TABLE IF NOT EXISTS contiene (
        id_tienda VARCHAR(15) NOT NULL,
        id_carrito BIGINT NOT NULL,
        id_variedad VARCHAR(15) NOT NULL REFERENCES variedad (id_variedad),
        cantidad BIGINT NOT NULL CHECK (cantidad BETWEEN 0 AND 100),
        PRIMARY KEY (id_tienda, id_carrito, id_variedad),
        FOREIGN KEY (id_tienda, id_carrito) REFERENCES carrito (id_tienda, id_carrito)
    )",
    "CREATE TABLE IF NOT EXISTS cafetera (
        fabricante TEXT NOT NULL,
        modelo TEXT NOT NULL,
        presion DOUBLE PRECISION NOT NULL,
        PRIMARY KEY (fabricante, modelo)
    )",
    "CREATE TABLE IF NOT EXISTS tiene_cafetera (
        fabricante_caf TEXT NOT NULL,
        modelo_caf TEXT NOT NULL,
        dni_cliente VARCHAR(9) NOT NULL REFERENCES cliente (dni),
        PRIMARY KEY (fabricante_caf, modelo_caf, dni_cliente),
        FOREIGN KEY (fabricante_caf, modelo_caf) REFERENCES cafetera (fabricante, modelo)
    )",
    "CREATE TABLE IF NOT EXISTS var_en_cafetera (
        fabricante_caf TEXT NOT NULL,
        modelo_caf TEXT NOT NULL,
        id_variedad VARCHAR(15) NOT NULL REFERENCES variedad (id_variedad),
        PRIMARY KEY (fabricante_caf, modelo_caf, id_variedad),
        FOREIGN KEY (fabricante_caf, modelo_caf) REFERENCES cafetera (fabricante, modelo)
    )",
    "CREATE TABLE IF NOT EXISTS receta (
        id_tipo_grano VARCHAR(15) NOT NULL REFERENCES tipo_grano (id_tipo_grano),
        id_variedad VARCHAR(15) NOT NULL REFERENCES variedad (id_variedad),
        cantidad DOUBLE PRECISION NOT NULL,
        nivel_molido BIGINT NOT NULL CHECK (nivel_molido BETWEEN 0 AND 5),
        PRIMARY KEY (id_tipo_grano, id_variedad)
    )",
];

/// Creates every table that does not exist yet.
pub async fn create_schema(conn: &mut PgConnection) -> Result<(), sqlx::Error> {
    for statement in CREATE_TABLES {
        sqlx::query(statement).execute(&mut *conn).await?;
    }
    Ok(())
}

/// Drops every table, dependants first.
pub async fn drop_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    for table in nesprisa_core::TableName::ALL.iter().rev() {
        let statement = format!("DROP TABLE IF EXISTS {table} CASCADE");
        sqlx::query(&statement).execute(pool).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use nesprisa_core::TableName;

    use super::*;

    #[test]
    fn one_statement_per_table_in_run_order() {
        assert_eq!(CREATE_TABLES.len(), TableName::ALL.len());
        for (statement, table) in CREATE_TABLES.iter().zip(TableName::ALL) {
            let prefix = format!("CREATE TABLE IF NOT EXISTS {table} (");
            assert!(statement.starts_with(&prefix), "{table}");
        }
    }

    #[test]
    fn variety_names_are_not_unique_across_runs() {
        let variedad = CREATE_TABLES
            .iter()
            .find(|statement| statement.starts_with("CREATE TABLE IF NOT EXISTS variedad ("))
            .expect("variedad table");
        assert!(variedad.contains("denominacion TEXT NOT NULL,"));
        assert!(!variedad.contains("UNIQUE"));
    }
}
