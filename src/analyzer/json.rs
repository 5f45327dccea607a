//! Structural analysis of nested JSON rows

use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, info};

use super::shape::{Shape, as_array, as_object, is_object_like, shape_of};
use crate::error::SchemaError;
use crate::inference::{InferenceConfig, TypeInferenceEngine};
use crate::models::{ColumnSchema, DataRow, ForeignKey, SqlType, TableSchema};
use crate::naming::{NameGenerator, NamingOptions};
use crate::schema::SchemaRegistry;

/// Builds a relational table graph from nested JSON rows
///
/// Nested objects become child tables referenced by a nullable foreign key
/// on the parent. Arrays containing objects become child tables that point
/// back at their parent row. Arrays of primitives stay on the parent as a
/// serialized TEXT column.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use tabular_sql::analyzer::JsonAnalyzer;
///
/// let row = json!({"name": "Alice", "address": {"city": "Maputo"}});
/// let rows = vec![row.as_object().unwrap().clone()];
///
/// let mut analyzer = JsonAnalyzer::new();
/// let registry = analyzer.analyze(&rows, "users").unwrap();
/// assert_eq!(registry.table_order(), ["addresses", "users"]);
/// ```
pub struct JsonAnalyzer {
    pub(super) names: NameGenerator,
    pub(super) inference: TypeInferenceEngine,
    pub(super) registry: SchemaRegistry,
    preserve_issued_names: bool,
}

impl Default for JsonAnalyzer {
    fn default() -> Self {
        Self {
            names: NameGenerator::new(),
            inference: TypeInferenceEngine::new(),
            registry: SchemaRegistry::new(),
            preserve_issued_names: false,
        }
    }
}

impl JsonAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given naming configuration for generated tables and keys
    pub fn with_naming(mut self, options: NamingOptions) -> Self {
        self.names = NameGenerator::with_options(options);
        self
    }

    /// Use the given inference configuration for scalar columns
    pub fn with_inference(mut self, config: InferenceConfig) -> Self {
        self.inference = TypeInferenceEngine::with_config(config);
        self
    }

    /// Keep names issued by earlier runs reserved in later runs
    pub fn preserve_issued_names(mut self, preserve: bool) -> Self {
        self.preserve_issued_names = preserve;
        self
    }

    /// Registry built by the last [`JsonAnalyzer::analyze`] call
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Analyze `rows` as the content of a root table named after `root_table_name`.
    ///
    /// Rebuilds the registry from scratch and resolves the creation order.
    pub fn analyze(&mut self, rows: &[DataRow], root_table_name: &str) -> Result<&SchemaRegistry, SchemaError> {
        if !self.preserve_issued_names {
            self.names = self.names.fresh();
        }
        self.registry = SchemaRegistry::new();

        let root_name = self.names.generate_table_name(root_table_name);
        let mut root = TableSchema::new(root_name);
        self.analyze_structure(rows, &mut root);
        self.registry.add_table(root);

        self.registry.resolve_dependencies()?;
        info!(
            tables = self.registry.len(),
            order = ?self.registry.table_order(),
            "Analyzed nested structure"
        );
        Ok(&self.registry)
    }

    fn analyze_structure(&mut self, objects: &[DataRow], table: &mut TableSchema) {
        let mut seen: HashSet<String> = table.columns.iter().map(|c| c.name.clone()).collect();
        for name in &seen {
            self.names.reserve_column_name(&table.name, name);
        }
        for key in objects.iter().flat_map(|obj| obj.keys()) {
            self.names.reserve_column_name(&table.name, key);
        }

        for obj in objects {
            for (key, value) in obj {
                if !seen.insert(key.clone()) {
                    continue;
                }
                match shape_of(value) {
                    Shape::Object(_) => self.add_nested_object(key, objects, table),
                    Shape::Array(items) if items.iter().any(is_object_like) => {
                        self.add_array_of_objects(key, objects, table)
                    }
                    Shape::Array(_) => {
                        table.add_column(ColumnSchema::new(key.as_str(), SqlType::Text).array())
                    }
                    Shape::Scalar => {
                        let sql_type = self.inference.scalar_type(value);
                        table.add_column(ColumnSchema::new(key.as_str(), sql_type));
                    }
                }
            }
        }
    }

    fn add_nested_object(&mut self, key: &str, objects: &[DataRow], parent: &mut TableSchema) {
        let child_name = self.names.generate_table_name(key);
        let mut child = TableSchema::child_of(child_name.clone(), parent, key);
        // Registering before recursing keeps discovery order parent-first.
        self.registry.add_table(child.clone());

        let fk_column = self.names.generate_foreign_key_column_name(&parent.name, &child_name);
        parent.add_column(ColumnSchema::new(fk_column.as_str(), SqlType::Integer).nested());
        parent.add_foreign_key(ForeignKey::new(fk_column.as_str(), child_name.as_str(), true));
        debug!(parent = %parent.name, child = %child_name, fk = %fk_column, "Nested object table");

        let nested: Vec<DataRow> = objects
            .iter()
            .filter_map(|obj| obj.get(key))
            .filter_map(|value| as_object(value).map(|map| map.into_owned()))
            .collect();
        self.analyze_structure(&nested, &mut child);
        self.registry.add_table(child);
    }

    fn add_array_of_objects(&mut self, key: &str, objects: &[DataRow], parent: &mut TableSchema) {
        let child_name = self.names.generate_table_name(key);
        let mut child = TableSchema::child_of(child_name.clone(), parent, key);

        let parent_id_column = format!("{}_id", parent.name);
        child.add_column(ColumnSchema::new(parent_id_column.as_str(), SqlType::Integer).not_null());
        child.add_foreign_key(ForeignKey::new(parent_id_column.as_str(), parent.name.as_str(), false));
        self.registry.add_table(child.clone());
        debug!(parent = %parent.name, child = %child_name, fk = %parent_id_column, "Array of objects table");

        let elements: Vec<DataRow> = objects
            .iter()
            .filter_map(|obj| obj.get(key))
            .filter_map(|value| as_array(value).map(|items| items.into_owned()))
            .flatten()
            .filter_map(|element: Value| as_object(&element).map(|map| map.into_owned()))
            .collect();
        if !elements.is_empty() {
            self.analyze_structure(&elements, &mut child);
        }
        self.registry.add_table(child);
    }
}
