//! Oracle dialect

use serde_json::Value;

use super::Dialect;
use crate::models::SqlType;

/// Oracle dialect
///
/// Identifiers are upper-cased; multi-row chunks use `INSERT ALL`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OracleDialect;

impl Dialect for OracleDialect {
    fn name(&self) -> &'static str {
        "oracle"
    }

    fn quote_identifier(&self, identifier: &str) -> String {
        format!("\"{}\"", identifier.to_uppercase().replace('"', "\"\""))
    }

    fn map_type(&self, sql_type: SqlType) -> &'static str {
        match sql_type {
            SqlType::Integer => "NUMBER(10)",
            SqlType::Float => "NUMBER",
            SqlType::Text => "CLOB",
            SqlType::Date => "DATE",
            SqlType::DateTime => "TIMESTAMP",
            SqlType::Boolean => "NUMBER(1)",
        }
    }

    fn boolean_literal(&self, value: bool) -> &'static str {
        if value { "1" } else { "0" }
    }

    fn inline_primary_key(&self) -> bool {
        false
    }

    fn insert_chunk(&self, table: &str, columns: &[String], chunk: &[Vec<Value>]) -> String {
        let table = self.quote_identifier(table);
        let columns = self.column_list(columns);
        if let [row] = chunk {
            return format!(
                "INSERT INTO {} ({}) VALUES ({});\n\n",
                table,
                columns,
                self.value_list(row)
            );
        }

        let mut sql = String::from("INSERT ALL\n");
        for row in chunk {
            sql.push_str(&format!(
                "  INTO {} ({}) VALUES ({})\n",
                table,
                columns,
                self.value_list(row)
            ));
        }
        sql.push_str("SELECT 1 FROM DUAL;\n\n");
        sql
    }
}
