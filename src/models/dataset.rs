//! In-memory dataset shared by loaders, transforms and generators

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::import::{InputFormat, LoadError};

/// A single row: column name to loosely-typed value, in insertion order
pub type DataRow = Map<String, Value>;

/// Ordered column names plus ordered rows
///
/// Column names are not guaranteed unique until normalized, and rows need
/// not share the same key set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub rows: Vec<DataRow>,
}

impl Dataset {
    pub fn new(columns: Vec<String>, rows: Vec<DataRow>) -> Self {
        Self { columns, rows }
    }

    /// Build a dataset whose columns are the union of the row keys in first-seen order
    pub fn from_rows(rows: Vec<DataRow>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for row in &rows {
            for key in row.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }
        Self { columns, rows }
    }

    /// Decode a JSON document: an array of objects or a single object.
    ///
    /// Array elements that are not objects are skipped.
    pub fn from_json_value(value: Value) -> Result<Self, LoadError> {
        match value {
            Value::Array(items) => {
                let rows = items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::Object(map) => Some(map),
                        _ => None,
                    })
                    .collect();
                Ok(Self::from_rows(rows))
            }
            Value::Object(map) => Ok(Self::from_rows(vec![map])),
            other => Err(LoadError::parse(
                InputFormat::Json,
                format!("expected a JSON object or array of objects, found {}", json_kind(&other)),
            )),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of `column` across all rows, `Null` where a row lacks the key
    pub fn column_values<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.rows.iter().map(move |row| row.get(column).unwrap_or(&Value::Null))
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
