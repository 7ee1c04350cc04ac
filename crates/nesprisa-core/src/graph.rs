use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::tables::TableName;

/// Summary of FK graph structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FkGraphSummary {
    pub nodes: usize,
    pub edges: usize,
}

/// Report for FK dependency ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FkGraphReport {
    pub summary: FkGraphSummary,
    pub topo_order: Option<Vec<TableName>>,
    pub cycle: Option<Vec<TableName>>,
}

/// Build a deterministic FK dependency report for the given tables.
pub fn build_fk_graph_report(tables: &[TableName]) -> FkGraphReport {
    let graph = build_adjacency(tables);
    let nodes = graph.len();
    let edges = graph.values().map(|targets| targets.len()).sum();
    let summary = FkGraphSummary { nodes, edges };

    match toposort(&graph) {
        Ok(order) => FkGraphReport {
            summary,
            topo_order: Some(order),
            cycle: None,
        },
        Err(cycle) => FkGraphReport {
            summary,
            topo_order: None,
            cycle: Some(cycle),
        },
    }
}

/// Check that every table in `order` comes after all of its dependencies.
///
/// Dependencies missing from `order` are not reported here; callers decide
/// whether a partial order is acceptable.
pub fn validate_order(order: &[TableName]) -> Result<()> {
    let mut seen = BTreeSet::new();
    for table in order {
        for dependency in table.dependencies() {
            if order.contains(dependency) && !seen.contains(dependency) {
                return Err(Error::InvalidOrder {
                    table: *table,
                    dependency: *dependency,
                });
            }
        }
        seen.insert(*table);
    }

    let report = build_fk_graph_report(order);
    match report.cycle {
        Some(cycle) => Err(Error::Cycle(cycle)),
        None => Ok(()),
    }
}

/// Parent to children edges, restricted to `tables`.
fn build_adjacency(tables: &[TableName]) -> BTreeMap<TableName, BTreeSet<TableName>> {
    let mut graph: BTreeMap<TableName, BTreeSet<TableName>> = BTreeMap::new();

    for table in tables {
        graph.entry(*table).or_default();
        for dependency in table.dependencies() {
            if tables.contains(dependency) {
                graph.entry(*dependency).or_default().insert(*table);
            }
        }
    }

    graph
}

fn toposort(
    graph: &BTreeMap<TableName, BTreeSet<TableName>>,
) -> std::result::Result<Vec<TableName>, Vec<TableName>> {
    let mut indegree: BTreeMap<TableName, usize> = graph.keys().map(|node| (*node, 0)).collect();

    for targets in graph.values() {
        for target in targets {
            *indegree.entry(*target).or_insert(0) += 1;
        }
    }

    let mut ready: BTreeSet<TableName> = indegree
        .iter()
        .filter_map(|(node, count)| if *count == 0 { Some(*node) } else { None })
        .collect();

    let mut order = Vec::with_capacity(graph.len());

    while let Some(node) = ready.pop_first() {
        order.push(node);

        if let Some(targets) = graph.get(&node) {
            for target in targets {
                if let Some(count) = indegree.get_mut(target) {
                    *count = count.saturating_sub(1);
                    if *count == 0 {
                        ready.insert(*target);
                    }
                }
            }
        }
    }

    if order.len() == graph.len() {
        Ok(order)
    } else {
        let cycle_nodes = indegree
            .into_iter()
            .filter_map(|(node, count)| if count > 0 { Some(node) } else { None })
            .collect();
        Err(cycle_nodes)
    }
}
