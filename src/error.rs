//! Error types for dataset conversion

use thiserror::Error;

#[cfg(feature = "fetch")]
use crate::fetch::FetchError;
use crate::import::LoadError;
use crate::transform::TransformError;

/// Invalid generation options
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Dialect name outside the supported set
    #[error(
        "Unsupported SQL dialect: {0}. Expected: generic, postgres, mysql, sqlite, sqlserver, oracle"
    )]
    UnknownDialect(String),

    /// Naming convention name outside the supported set
    #[error("Unsupported naming convention: {0}. Expected: snake, camel, pascal")]
    UnknownNamingConvention(String),

    /// Type threshold outside 0.0 - 1.0
    #[error("Invalid type threshold: {0} (expected a value between 0.0 and 1.0)")]
    InvalidThreshold(f64),

    /// Root table name is blank
    #[error("Table name must not be empty")]
    EmptyTableName,

    /// Config file could not be read or parsed
    #[error("Config file error: {0}")]
    File(String),
}

/// Structural problems in a table graph
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// Foreign keys form a cycle, so no creation order exists
    #[error("Foreign key cycle detected involving table '{0}'")]
    Cycle(String),

    /// Foreign key points at a table that was never registered
    #[error("Foreign key {table}.{column} references unknown table '{ref_table}'")]
    UnknownReference {
        table: String,
        column: String,
        ref_table: String,
    },
}

/// Any failure of a conversion run
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[cfg(feature = "fetch")]
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
