//! Column model for generated tables

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical SQL type produced by inference and structural analysis
///
/// Dialects map these six types onto their own native type names when
/// emitting `CREATE TABLE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SqlType {
    Integer,
    Float,
    Text,
    Date,
    DateTime,
    Boolean,
}

impl SqlType {
    /// Canonical (dialect-neutral) type name
    pub fn as_str(&self) -> &'static str {
        match self {
            SqlType::Integer => "INTEGER",
            SqlType::Float => "FLOAT",
            SqlType::Text => "TEXT",
            SqlType::Date => "DATE",
            SqlType::DateTime => "DATETIME",
            SqlType::Boolean => "BOOLEAN",
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SqlType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "INTEGER" => Ok(SqlType::Integer),
            "FLOAT" => Ok(SqlType::Float),
            "TEXT" => Ok(SqlType::Text),
            "DATE" => Ok(SqlType::Date),
            "DATETIME" => Ok(SqlType::DateTime),
            "BOOLEAN" => Ok(SqlType::Boolean),
            _ => Err(format!(
                "Invalid SQL type: {}. Expected: INTEGER, FLOAT, TEXT, DATE, DATETIME, BOOLEAN",
                s
            )),
        }
    }
}

/// A column of a generated table
///
/// # Example
///
/// ```rust
/// use tabular_sql::models::{ColumnSchema, SqlType};
///
/// let column = ColumnSchema::new("city", SqlType::Text);
/// assert!(column.nullable);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSchema {
    /// Column name
    pub name: String,
    /// Canonical SQL type
    pub sql_type: SqlType,
    /// Whether the column allows NULL values (default: true)
    #[serde(default = "default_true")]
    pub nullable: bool,
    /// Foreign-key placeholder pointing at a nested-object child table
    #[serde(default)]
    pub is_nested: bool,
    /// Holds a serialized array of primitive values
    #[serde(default)]
    pub is_array: bool,
}

fn default_true() -> bool {
    true
}

impl ColumnSchema {
    /// Create a nullable plain column
    pub fn new(name: impl Into<String>, sql_type: SqlType) -> Self {
        Self {
            name: name.into(),
            sql_type,
            nullable: true,
            is_nested: false,
            is_array: false,
        }
    }

    /// The synthetic `INTEGER NOT NULL` key column every analyzed table starts with
    pub fn primary_key(name: impl Into<String>) -> Self {
        Self::new(name, SqlType::Integer).not_null()
    }

    /// Mark the column as NOT NULL
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Mark the column as a nested-object foreign-key placeholder
    pub fn nested(mut self) -> Self {
        self.is_nested = true;
        self
    }

    /// Mark the column as a serialized primitive array
    pub fn array(mut self) -> Self {
        self.is_array = true;
        self
    }
}
