use std::collections::BTreeMap;

use nesprisa_core::{TableName, TableRows};

use crate::errors::GenerationError;
use crate::foreign::SeedContext;
use crate::generators::{self, GeneratorContext, TableGenerator};

/// Rows per table when nothing else is configured.
pub const DEFAULT_ROWS: usize = 10;

/// Generator for a table plus the number of rows a full run asks of it.
pub struct TableFactory {
    generator: Box<dyn TableGenerator>,
    rows: usize,
}

impl TableFactory {
    pub fn table(&self) -> TableName {
        self.generator.table()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn generate(
        &self,
        pools: &SeedContext,
        count: usize,
        ctx: &mut GeneratorContext<'_>,
    ) -> Result<TableRows, GenerationError> {
        self.generator.generate(pools, count, ctx)
    }
}

/// Registry of table generators keyed by table.
pub struct TableRegistry {
    factories: BTreeMap<TableName, TableFactory>,
}

impl std::fmt::Debug for TableRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.factories.iter().map(|(table, factory)| (table, factory.rows)))
            .finish()
    }
}

impl TableRegistry {
    /// Registry with every table and `default_rows` rows each.
    pub fn new(default_rows: usize) -> Self {
        let mut registry = Self::empty();
        generators::register_all(&mut registry, default_rows);
        registry
    }

    pub fn empty() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Registers `generator`, replacing any previous one for the same table.
    pub fn register_generator(&mut self, generator: Box<dyn TableGenerator>, rows: usize) {
        self.factories
            .insert(generator.table(), TableFactory { generator, rows });
    }

    pub fn factory(&self, table: TableName) -> Result<&TableFactory, GenerationError> {
        self.factories
            .get(&table)
            .ok_or_else(|| GenerationError::UnknownTable(table.to_string()))
    }

    pub fn lookup(&self, name: &str) -> Result<&TableFactory, GenerationError> {
        let table: TableName = name.parse()?;
        self.factory(table)
    }

    pub fn contains(&self, table: TableName) -> bool {
        self.factories.contains_key(&table)
    }

    pub fn rows_for(&self, table: TableName) -> Result<usize, GenerationError> {
        Ok(self.factory(table)?.rows)
    }

    pub fn set_rows(&mut self, table: TableName, rows: usize) -> Result<(), GenerationError> {
        let factory = self
            .factories
            .get_mut(&table)
            .ok_or_else(|| GenerationError::UnknownTable(table.to_string()))?;
        factory.rows = rows;
        Ok(())
    }

    pub fn set_all_rows(&mut self, rows: usize) {
        for factory in self.factories.values_mut() {
            factory.rows = rows;
        }
    }

    /// Registered tables in run order.
    pub fn tables(&self) -> impl Iterator<Item = TableName> + '_ {
        TableName::ALL
            .into_iter()
            .filter(|table| self.factories.contains_key(table))
    }

    pub fn generate(
        &self,
        table: TableName,
        pools: &SeedContext,
        count: usize,
        ctx: &mut GeneratorContext<'_>,
    ) -> Result<TableRows, GenerationError> {
        self.factory(table)?.generate(pools, count, ctx)
    }
}

impl Default for TableRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_ROWS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_table_is_registered_with_default_rows() {
        let registry = TableRegistry::default();
        let tables: Vec<TableName> = registry.tables().collect();
        assert_eq!(tables, TableName::ALL.to_vec());
        for table in tables {
            assert_eq!(registry.rows_for(table).unwrap(), DEFAULT_ROWS);
            assert_eq!(registry.factory(table).unwrap().table(), table);
        }
    }

    #[test]
    fn lookup_by_name() {
        let registry = TableRegistry::default();
        assert_eq!(
            registry.lookup("var_en_cafetera").unwrap().table(),
            TableName::VarEnCafetera
        );
        assert!(matches!(
            registry.lookup("cafeteria"),
            Err(GenerationError::UnknownTable(name)) if name == "cafeteria"
        ));
    }

    #[test]
    fn empty_registry_rejects_tables() {
        let mut registry = TableRegistry::empty();
        assert!(matches!(
            registry.factory(TableName::Pais),
            Err(GenerationError::UnknownTable(_))
        ));
        assert!(registry.set_rows(TableName::Pais, 3).is_err());
    }

    #[test]
    fn row_counts_can_be_overridden() {
        let mut registry = TableRegistry::new(4);
        registry.set_rows(TableName::Carrito, 25).unwrap();
        assert_eq!(registry.rows_for(TableName::Carrito).unwrap(), 25);
        assert_eq!(registry.rows_for(TableName::Pais).unwrap(), 4);
        registry.set_all_rows(7);
        assert_eq!(registry.rows_for(TableName::Carrito).unwrap(), 7);
    }
}
