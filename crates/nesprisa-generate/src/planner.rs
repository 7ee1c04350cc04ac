use std::collections::{BTreeSet, VecDeque};

use nesprisa_core::TableName;

use crate::errors::GenerationError;
use crate::registry::TableRegistry;

/// Planned generation task for a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationTask {
    pub table: TableName,
    pub rows: usize,
}

/// Build the ordered list of tables to seed.
///
/// Without targets every registered table is seeded. With targets, missing
/// parents are either added (`auto_generate_parents`) or reported.
pub fn plan_tables(
    registry: &TableRegistry,
    targets: Option<&[TableName]>,
    auto_generate_parents: bool,
) -> Result<Vec<GenerationTask>, GenerationError> {
    let mut selected: BTreeSet<TableName> = match targets {
        Some(targets) => targets.iter().copied().collect(),
        None => registry.tables().collect(),
    };

    if auto_generate_parents {
        let mut queue: VecDeque<TableName> = selected.iter().copied().collect();
        while let Some(child) = queue.pop_front() {
            for parent in child.dependencies() {
                if selected.insert(*parent) {
                    queue.push_back(*parent);
                }
            }
        }
    } else {
        for table in &selected {
            if let Some(parent) = table
                .dependencies()
                .iter()
                .find(|parent| !selected.contains(*parent))
            {
                return Err(GenerationError::MissingDependency {
                    table: *table,
                    dependency: *parent,
                });
            }
        }
    }

    let order: Vec<TableName> = TableName::ALL
        .into_iter()
        .filter(|table| selected.contains(table))
        .collect();
    nesprisa_core::validate_order(&order)?;

    let mut tasks = Vec::with_capacity(order.len());
    for table in order {
        tasks.push(GenerationTask {
            table,
            rows: registry.rows_for(table)?,
        });
    }

    if tasks.is_empty() {
        return Err(GenerationError::InvalidOptions(
            "no tables selected for seeding".to_string(),
        ));
    }

    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables(tasks: &[GenerationTask]) -> Vec<TableName> {
        tasks.iter().map(|task| task.table).collect()
    }

    #[test]
    fn full_plan_follows_fixed_order() {
        let registry = TableRegistry::default();
        let tasks = plan_tables(&registry, None, true).unwrap();
        assert_eq!(tables(&tasks), TableName::ALL.to_vec());
    }

    #[test]
    fn targets_pull_in_parents() {
        let registry = TableRegistry::default();
        let tasks = plan_tables(&registry, Some(&[TableName::Contiene]), true).unwrap();
        assert_eq!(
            tables(&tasks),
            vec![
                TableName::Variedad,
                TableName::Tienda,
                TableName::Cliente,
                TableName::Carrito,
                TableName::Contiene,
            ]
        );
    }

    #[test]
    fn targets_without_parents_fail_when_not_auto() {
        let registry = TableRegistry::default();
        let err = plan_tables(&registry, Some(&[TableName::Region]), false).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::MissingDependency {
                table: TableName::Region,
                dependency: TableName::Pais,
            }
        ));
    }

    #[test]
    fn rows_come_from_registry() {
        let mut registry = TableRegistry::new(3);
        registry.set_rows(TableName::Pais, 12).unwrap();
        let tasks = plan_tables(&registry, Some(&[TableName::Pais]), false).unwrap();
        assert_eq!(
            tasks,
            vec![GenerationTask {
                table: TableName::Pais,
                rows: 12,
            }]
        );
    }
}
