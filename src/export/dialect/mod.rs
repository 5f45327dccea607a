//! SQL dialects
//!
//! Every dialect shares the statement layout implemented by the default
//! methods of [`Dialect`]; implementations override identifier quoting,
//! type names, boolean literals and the few statement shapes that differ.

mod generic;
mod mysql;
mod oracle;
mod postgres;
mod sqlite;
mod sqlserver;

pub use generic::GenericDialect;
pub use mysql::MySqlDialect;
pub use oracle::OracleDialect;
pub use postgres::PostgresDialect;
pub use sqlite::SqliteDialect;
pub use sqlserver::SqlServerDialect;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::models::{SqlType, TableSchema};

/// Dialect-specific SQL text generation
pub trait Dialect: Send + Sync {
    /// Returns the dialect name
    fn name(&self) -> &'static str;

    /// Quote an identifier, doubling embedded quote characters
    fn quote_identifier(&self, identifier: &str) -> String {
        format!("\"{}\"", identifier.replace('"', "\"\""))
    }

    /// Native type name for a canonical type
    fn map_type(&self, sql_type: SqlType) -> &'static str;

    /// Literal used for boolean values
    fn boolean_literal(&self, value: bool) -> &'static str {
        if value { "TRUE" } else { "FALSE" }
    }

    /// Whether the key column carries an inline `PRIMARY KEY`
    /// (otherwise a trailing `PRIMARY KEY (col)` clause is emitted)
    fn inline_primary_key(&self) -> bool {
        true
    }

    /// Text placed after the closing parenthesis of `CREATE TABLE`
    fn table_options(&self) -> &'static str {
        ""
    }

    /// Format a value as a SQL literal
    fn format_value(&self, value: &Value) -> String {
        match value {
            Value::Null => "NULL".to_string(),
            Value::Bool(b) => self.boolean_literal(*b).to_string(),
            Value::Number(n) => n.to_string(),
            Value::String(s) => quote_string(s),
            other => quote_string(&other.to_string()),
        }
    }

    /// Generates `CREATE TABLE` for `table`, including key and foreign key clauses
    fn create_table(&self, table: &TableSchema) -> String {
        let mut sql = format!("CREATE TABLE {} (\n", self.quote_identifier(&table.name));

        let column_defs: Vec<String> = table
            .columns
            .iter()
            .map(|column| {
                let mut def = format!(
                    "  {} {}",
                    self.quote_identifier(&column.name),
                    self.map_type(column.sql_type)
                );
                let is_key = table.primary_key.as_deref() == Some(column.name.as_str());
                if is_key && self.inline_primary_key() {
                    def.push_str(" PRIMARY KEY");
                } else if !column.nullable {
                    def.push_str(" NOT NULL");
                }
                def
            })
            .collect();
        sql.push_str(&column_defs.join(",\n"));

        if !self.inline_primary_key()
            && let Some(key) = &table.primary_key
        {
            sql.push_str(&format!(",\n  PRIMARY KEY ({})", self.quote_identifier(key)));
        }

        for fk in &table.foreign_keys {
            sql.push_str(&format!(
                ",\n  FOREIGN KEY ({}) REFERENCES {} ({})",
                self.quote_identifier(&fk.column),
                self.quote_identifier(&fk.ref_table),
                self.quote_identifier(&fk.ref_column)
            ));
            if fk.nested_child {
                sql.push_str(" ON DELETE CASCADE");
            }
        }

        sql.push_str("\n)");
        sql.push_str(self.table_options());
        sql.push_str(";\n");
        sql
    }

    /// Generates batched `INSERT` statements, one per chunk of at most
    /// `batch_size` rows (`0` puts every row in one chunk)
    fn insert_into(&self, table: &str, columns: &[String], rows: &[Vec<Value>], batch_size: usize) -> String {
        if rows.is_empty() {
            return String::new();
        }
        let chunk_size = if batch_size == 0 { rows.len() } else { batch_size };
        rows.chunks(chunk_size)
            .map(|chunk| self.insert_chunk(table, columns, chunk))
            .collect()
    }

    /// One `INSERT` statement for a non-empty chunk of rows
    fn insert_chunk(&self, table: &str, columns: &[String], chunk: &[Vec<Value>]) -> String {
        let values: Vec<String> = chunk
            .iter()
            .map(|row| format!("({})", self.value_list(row)))
            .collect();
        format!(
            "INSERT INTO {} ({}) VALUES\n{};\n\n",
            self.quote_identifier(table),
            self.column_list(columns),
            values.join(",\n")
        )
    }

    /// Comma-separated quoted column names
    fn column_list(&self, columns: &[String]) -> String {
        columns
            .iter()
            .map(|c| self.quote_identifier(c))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Comma-separated formatted values
    fn value_list(&self, row: &[Value]) -> String {
        row.iter()
            .map(|v| self.format_value(v))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Single-quote `text`, doubling embedded single quotes
pub fn quote_string(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// Supported SQL dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    #[default]
    Generic,
    #[serde(alias = "postgresql")]
    Postgres,
    Mysql,
    Sqlite,
    #[serde(alias = "mssql")]
    Sqlserver,
    Oracle,
}

impl DialectKind {
    pub const ALL: [DialectKind; 6] = [
        DialectKind::Generic,
        DialectKind::Postgres,
        DialectKind::Mysql,
        DialectKind::Sqlite,
        DialectKind::Sqlserver,
        DialectKind::Oracle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DialectKind::Generic => "generic",
            DialectKind::Postgres => "postgres",
            DialectKind::Mysql => "mysql",
            DialectKind::Sqlite => "sqlite",
            DialectKind::Sqlserver => "sqlserver",
            DialectKind::Oracle => "oracle",
        }
    }

    /// The dialect implementation for this kind
    pub fn dialect(&self) -> Box<dyn Dialect> {
        match self {
            DialectKind::Generic => Box::new(GenericDialect),
            DialectKind::Postgres => Box::new(PostgresDialect),
            DialectKind::Mysql => Box::new(MySqlDialect),
            DialectKind::Sqlite => Box::new(SqliteDialect),
            DialectKind::Sqlserver => Box::new(SqlServerDialect),
            DialectKind::Oracle => Box::new(OracleDialect),
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DialectKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "generic" => Ok(DialectKind::Generic),
            "postgres" | "postgresql" => Ok(DialectKind::Postgres),
            "mysql" => Ok(DialectKind::Mysql),
            "sqlite" => Ok(DialectKind::Sqlite),
            "sqlserver" | "mssql" => Ok(DialectKind::Sqlserver),
            "oracle" => Ok(DialectKind::Oracle),
            _ => Err(ConfigError::UnknownDialect(s.to_string())),
        }
    }
}

/// Look up a dialect by name
pub fn dialect_for(name: &str) -> Result<Box<dyn Dialect>, ConfigError> {
    Ok(name.parse::<DialectKind>()?.dialect())
}
