//! Tabular SQL - convert tabular and nested data into SQL scripts
//!
//! Provides unified interfaces for:
//! - Loading datasets (CSV, JSON, XML files; JSON over HTTP)
//! - Rule-based dataset transformations
//! - Column type inference and name normalization
//! - Splitting nested JSON into related tables with foreign keys
//! - `CREATE TABLE` / `INSERT` generation for six SQL dialects
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use tabular_sql::{Dataset, DialectKind, GeneratorOptions, convert};
//!
//! let dataset = Dataset::from_json_value(json!([
//!     {"id": 1, "name": "Alice", "address": {"city": "Maputo"}}
//! ]))
//! .unwrap();
//!
//! let options = GeneratorOptions::builder()
//!     .dialect(DialectKind::Postgres)
//!     .table_name("users")
//!     .create_table(true)
//!     .build();
//!
//! let sql = convert(&dataset, options).unwrap();
//! assert!(sql.contains("CREATE TABLE \"addresses\""));
//! ```

pub mod analyzer;
pub mod config;
pub mod error;
pub mod export;
#[cfg(feature = "fetch")]
pub mod fetch;
pub mod import;
pub mod inference;
pub mod models;
pub mod naming;
pub mod schema;
pub mod transform;

// Re-export commonly used types
pub use analyzer::{ExtractedData, JsonAnalyzer};
pub use config::{GeneratorOptions, GeneratorOptionsBuilder};
pub use error::{ConfigError, ConvertError, SchemaError};
pub use export::{Dialect, DialectKind, SqlGenerator, dialect_for};
#[cfg(feature = "fetch")]
pub use fetch::{FetchError, Fetcher, RestFetcher};
pub use import::{InputFormat, LoadError, Loader, load_file, loader_for_path};
pub use inference::{InferenceConfig, TypeInferenceEngine};
pub use models::{ColumnSchema, DataRow, Dataset, ForeignKey, SqlType, TableSchema};
pub use naming::{NameGenerator, NamingConvention, NamingOptions, Normalizer};
pub use schema::SchemaRegistry;
pub use transform::{TransformEngine, TransformError, Transformation};

/// Generate the SQL script for `dataset` with a one-off generator
pub fn convert(dataset: &Dataset, options: GeneratorOptions) -> Result<String, ConvertError> {
    let mut generator = SqlGenerator::new(options)?;
    Ok(generator.generate(dataset)?)
}
