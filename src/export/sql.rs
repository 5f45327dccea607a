//! SQL script generation for datasets.
//!
//! Flat datasets become one table whose column types are inferred from the
//! values. Datasets holding nested objects or arrays of objects are split
//! into related tables first and emitted in dependency order.
//!
//! # Security
//!
//! All identifiers are quoted by the dialect and embedded quote characters
//! are doubled. String values are single-quoted with `'` doubled.

use serde_json::Value;
use tracing::{debug, info};

use super::dialect::Dialect;
use crate::analyzer::{JsonAnalyzer, has_nested_values};
use crate::config::GeneratorOptions;
use crate::error::{ConfigError, SchemaError};
use crate::inference::TypeInferenceEngine;
use crate::models::{DataRow, Dataset, SqlType, TableSchema};
use crate::naming::Normalizer;
use crate::schema::SchemaRegistry;

/// Generates a complete SQL script for a dataset
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use tabular_sql::config::GeneratorOptions;
/// use tabular_sql::export::SqlGenerator;
/// use tabular_sql::models::Dataset;
///
/// let dataset = Dataset::from_json_value(json!([{"name": "Alice", "age": 30}])).unwrap();
/// let options = GeneratorOptions::builder().table_name("people").create_table(true).build();
///
/// let mut generator = SqlGenerator::new(options).unwrap();
/// let sql = generator.generate(&dataset).unwrap();
/// assert!(sql.starts_with("CREATE TABLE \"people\""));
/// ```
pub struct SqlGenerator {
    options: GeneratorOptions,
    dialect: Box<dyn Dialect>,
    normalizer: Normalizer,
    inference: TypeInferenceEngine,
    analyzer: JsonAnalyzer,
}

impl SqlGenerator {
    /// Create a generator, failing fast on invalid options
    pub fn new(options: GeneratorOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        let analyzer = JsonAnalyzer::new()
            .with_naming(options.naming.clone())
            .with_inference(options.inference.clone())
            .preserve_issued_names(options.preserve_issued_names);
        Ok(Self {
            dialect: options.dialect.dialect(),
            normalizer: Normalizer::new(),
            inference: TypeInferenceEngine::with_config(options.inference.clone()),
            analyzer,
            options,
        })
    }

    /// Replace the column normalizer used on the flat path
    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    /// Registry of the last nested generation (empty after a flat one)
    pub fn registry(&self) -> &SchemaRegistry {
        self.analyzer.registry()
    }

    /// Generate the SQL script for `dataset`
    pub fn generate(&mut self, dataset: &Dataset) -> Result<String, SchemaError> {
        if has_nested_values(&dataset.rows) {
            info!(rows = dataset.len(), "Nested values found, generating related tables");
            self.generate_nested(&dataset.rows)
        } else {
            info!(rows = dataset.len(), "Generating flat table");
            Ok(self.generate_flat(dataset))
        }
    }

    /// Single-table script: optional `CREATE TABLE` then batched inserts
    pub fn generate_flat(&self, dataset: &Dataset) -> String {
        let columns = if self.options.normalize_columns {
            self.normalizer.normalize_column_names(&dataset.columns)
        } else {
            dataset.columns.clone()
        };

        // Re-key rows positionally so duplicate headers map to distinct columns.
        let rows: Vec<DataRow> = dataset
            .rows
            .iter()
            .map(|row| {
                dataset
                    .columns
                    .iter()
                    .zip(&columns)
                    .map(|(source, target)| {
                        (target.clone(), row.get(source).cloned().unwrap_or(Value::Null))
                    })
                    .collect()
            })
            .collect();

        let mut sql = String::new();
        if self.options.create_table {
            let types = self.inference.infer_column_types(&columns, &rows);
            let table = TableSchema::flat(
                self.options.table_name.as_str(),
                columns
                    .iter()
                    .map(|c| (c.clone(), types.get(c).copied().unwrap_or(SqlType::Text))),
            );
            debug!(columns = ?types, "Inferred column types");
            sql.push_str(&self.dialect.create_table(&table));
            sql.push('\n');
        }

        let values = row_values(&columns, &rows);
        sql.push_str(&self.dialect.insert_into(
            &self.options.table_name,
            &columns,
            &values,
            self.options.batch_size,
        ));
        sql
    }

    /// Multi-table script for rows holding nested objects or arrays
    pub fn generate_nested(&mut self, rows: &[DataRow]) -> Result<String, SchemaError> {
        self.analyzer.analyze(rows, &self.options.table_name)?;
        let extracted = self.analyzer.extract_nested_data(rows);
        let registry = self.analyzer.registry();

        let mut sql = String::new();
        if self.options.create_table {
            for table in registry.ordered_tables() {
                sql.push_str(&self.dialect.create_table(table));
                sql.push('\n');
            }
        }

        for table in registry.ordered_tables() {
            let Some(table_rows) = extracted.get(&table.name).filter(|r| !r.is_empty()) else {
                continue;
            };
            let columns = table.column_names();
            let values = row_values(&columns, table_rows);
            sql.push_str(&self.dialect.insert_into(
                &table.name,
                &columns,
                &values,
                self.options.batch_size,
            ));
            sql.push('\n');
            debug!(table = %table.name, rows = table_rows.len(), "Emitted inserts");
        }
        Ok(sql)
    }
}

/// Values of `columns` for each row, NULL where a row lacks the column
fn row_values(columns: &[String], rows: &[DataRow]) -> Vec<Vec<Value>> {
    rows.iter()
        .map(|row| {
            columns
                .iter()
                .map(|c| row.get(c).cloned().unwrap_or(Value::Null))
                .collect()
        })
        .collect()
}
