//! SQL Server dialect

use serde_json::Value;

use super::Dialect;
use crate::models::SqlType;

/// SQL Server dialect
///
/// Multi-row chunks are inserted from a `UNION ALL` derived table.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlServerDialect;

impl Dialect for SqlServerDialect {
    fn name(&self) -> &'static str {
        "sqlserver"
    }

    fn quote_identifier(&self, identifier: &str) -> String {
        format!("[{}]", identifier.replace(']', "]]"))
    }

    fn map_type(&self, sql_type: SqlType) -> &'static str {
        match sql_type {
            SqlType::Integer => "INT",
            SqlType::Float => "FLOAT",
            SqlType::Text => "NVARCHAR(MAX)",
            SqlType::Date => "DATE",
            SqlType::DateTime => "DATETIME2",
            SqlType::Boolean => "BIT",
        }
    }

    fn boolean_literal(&self, value: bool) -> &'static str {
        if value { "1" } else { "0" }
    }

    fn inline_primary_key(&self) -> bool {
        false
    }

    fn insert_chunk(&self, table: &str, columns: &[String], chunk: &[Vec<Value>]) -> String {
        let mut sql = format!(
            "INSERT INTO {} ({})\n",
            self.quote_identifier(table),
            self.column_list(columns)
        );
        if let [row] = chunk {
            sql.push_str(&format!("VALUES\n({})", self.value_list(row)));
        } else {
            let selects: Vec<String> = chunk
                .iter()
                .map(|row| format!("  SELECT {}", self.value_list(row)))
                .collect();
            sql.push_str("SELECT * FROM (\n");
            sql.push_str(&selects.join(" UNION ALL\n"));
            sql.push_str("\n) AS source");
        }
        sql.push_str(";\n\n");
        sql
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn columns() -> Vec<String> {
        vec!["id".to_string(), "ok".to_string()]
    }

    #[test]
    fn test_single_row_uses_values() {
        let sql = SqlServerDialect.insert_into("t", &columns(), &[vec![json!(1), json!(true)]], 100);
        assert_eq!(sql, "INSERT INTO [t] ([id], [ok])\nVALUES\n(1, 1);\n\n");
    }

    #[test]
    fn test_multi_row_uses_union_all() {
        let rows = vec![vec![json!(1), json!(true)], vec![json!(2), json!(false)]];
        let sql = SqlServerDialect.insert_into("t", &columns(), &rows, 100);
        assert_eq!(
            sql,
            "INSERT INTO [t] ([id], [ok])\nSELECT * FROM (\n  SELECT 1, 1 UNION ALL\n  SELECT 2, 0\n) AS source;\n\n"
        );
    }

    #[test]
    fn test_brackets_are_doubled() {
        assert_eq!(SqlServerDialect.quote_identifier("a]b"), "[a]]b]");
        assert_eq!(SqlServerDialect.map_type(SqlType::Text), "NVARCHAR(MAX)");
    }
}
