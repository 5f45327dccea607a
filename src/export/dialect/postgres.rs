//! PostgreSQL dialect

use super::Dialect;
use crate::models::SqlType;

/// PostgreSQL dialect
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn map_type(&self, sql_type: SqlType) -> &'static str {
        match sql_type {
            SqlType::Integer => "INTEGER",
            SqlType::Float => "DOUBLE PRECISION",
            SqlType::Text => "TEXT",
            SqlType::Date => "DATE",
            SqlType::DateTime => "TIMESTAMP",
            SqlType::Boolean => "BOOLEAN",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ColumnSchema, TableSchema};
    use serde_json::json;

    #[test]
    fn test_create_table_types() {
        let mut table = TableSchema::new("events");
        table.add_column(ColumnSchema::new("score", SqlType::Float));
        table.add_column(ColumnSchema::new("at", SqlType::DateTime));
        let sql = PostgresDialect.create_table(&table);
        assert_eq!(
            sql,
            "CREATE TABLE \"events\" (\n  \"id\" INTEGER PRIMARY KEY,\n  \"score\" DOUBLE PRECISION,\n  \"at\" TIMESTAMP\n);\n"
        );
    }

    #[test]
    fn test_booleans_are_keywords() {
        assert_eq!(PostgresDialect.format_value(&json!(false)), "FALSE");
    }
}
