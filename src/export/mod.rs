//! SQL export
//!
//! Provides SQL generation for the supported dialects:
//! - Generic (ANSI-style)
//! - PostgreSQL
//! - MySQL
//! - SQLite
//! - SQL Server
//! - Oracle

pub mod dialect;
pub mod sql;

// Re-export for convenience
pub use dialect::{
    Dialect, DialectKind, GenericDialect, MySqlDialect, OracleDialect, PostgresDialect, SqlServerDialect,
    SqliteDialect, dialect_for, quote_string,
};
pub use sql::SqlGenerator;
