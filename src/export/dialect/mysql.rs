//! MySQL dialect

use super::Dialect;
use crate::models::SqlType;

/// MySQL dialect (InnoDB, utf8mb4)
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlDialect;

impl Dialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote_identifier(&self, identifier: &str) -> String {
        format!("`{}`", identifier.replace('`', "``"))
    }

    fn map_type(&self, sql_type: SqlType) -> &'static str {
        match sql_type {
            SqlType::Integer => "INT",
            SqlType::Float => "DOUBLE",
            SqlType::Text => "TEXT",
            SqlType::Date => "DATE",
            SqlType::DateTime => "DATETIME",
            SqlType::Boolean => "TINYINT(1)",
        }
    }

    fn inline_primary_key(&self) -> bool {
        false
    }

    fn table_options(&self) -> &'static str {
        " ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci"
    }
}
