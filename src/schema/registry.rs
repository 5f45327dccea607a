//! Schema registry and dependency ordering

use petgraph::algo::toposort;
use petgraph::graph::NodeIndex;
use petgraph::{Directed, Graph};
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::error::SchemaError;
use crate::models::TableSchema;

/// Owns every table of one analysis run
///
/// Tables are kept in discovery order. [`resolve_dependencies`] computes a
/// creation order in which no table precedes a table it references.
///
/// [`resolve_dependencies`]: SchemaRegistry::resolve_dependencies
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    tables: HashMap<String, TableSchema>,
    discovery_order: Vec<String>,
    table_order: Vec<String>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table, replacing any table of the same name in place
    pub fn add_table(&mut self, table: TableSchema) {
        if !self.tables.contains_key(&table.name) {
            self.discovery_order.push(table.name.clone());
        }
        self.tables.insert(table.name.clone(), table);
    }

    pub fn get_table(&self, name: &str) -> Option<&TableSchema> {
        self.tables.get(name)
    }

    pub fn get_table_mut(&mut self, name: &str) -> Option<&mut TableSchema> {
        self.tables.get_mut(name)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Tables in discovery order
    pub fn tables(&self) -> impl Iterator<Item = &TableSchema> {
        self.discovery_order.iter().filter_map(|name| self.tables.get(name))
    }

    /// Creation order computed by the last [`SchemaRegistry::resolve_dependencies`] call
    pub fn table_order(&self) -> &[String] {
        &self.table_order
    }

    /// Tables in creation order
    pub fn ordered_tables(&self) -> impl Iterator<Item = &TableSchema> {
        self.table_order.iter().filter_map(|name| self.tables.get(name))
    }

    /// The first table in creation order without a parent
    pub fn root_table(&self) -> Option<&TableSchema> {
        self.ordered_tables().find(|t| t.parent_table.is_none())
    }

    /// Tables derived from `parent`, in creation order
    pub fn children_of<'a>(&'a self, parent: &'a str) -> impl Iterator<Item = &'a TableSchema> + 'a {
        self.ordered_tables()
            .filter(move |t| t.parent_table.as_deref() == Some(parent))
    }

    /// Recompute the creation order from the current foreign keys.
    ///
    /// Depth-first over tables in discovery order: every table referenced by
    /// a foreign key is placed before the table holding it. Dangling
    /// references and cycles are rejected before any order is produced.
    pub fn resolve_dependencies(&mut self) -> Result<(), SchemaError> {
        self.check_acyclic()?;

        let mut visited = HashSet::new();
        let mut order = Vec::with_capacity(self.tables.len());
        for name in &self.discovery_order {
            self.visit(name, &mut visited, &mut order);
        }

        debug!(order = ?order, "Resolved table creation order");
        self.table_order = order;
        Ok(())
    }

    fn visit(&self, name: &str, visited: &mut HashSet<String>, order: &mut Vec<String>) {
        if !visited.insert(name.to_string()) {
            return;
        }
        if let Some(table) = self.tables.get(name) {
            for fk in &table.foreign_keys {
                self.visit(&fk.ref_table, visited, order);
            }
        }
        order.push(name.to_string());
    }

    fn check_acyclic(&self) -> Result<(), SchemaError> {
        let mut graph = Graph::<&str, (), Directed>::new();
        let mut node_map: HashMap<&str, NodeIndex> = HashMap::new();

        for name in &self.discovery_order {
            node_map.insert(name.as_str(), graph.add_node(name.as_str()));
        }

        for table in self.tables() {
            let from = node_map[table.name.as_str()];
            for fk in &table.foreign_keys {
                let Some(&to) = node_map.get(fk.ref_table.as_str()) else {
                    return Err(SchemaError::UnknownReference {
                        table: table.name.clone(),
                        column: fk.column.clone(),
                        ref_table: fk.ref_table.clone(),
                    });
                };
                graph.add_edge(from, to, ());
            }
        }

        toposort(&graph, None)
            .map(|_| ())
            .map_err(|cycle| SchemaError::Cycle(graph[cycle.node_id()].to_string()))
    }
}
