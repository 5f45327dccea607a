//! Naming service
//!
//! Turns field and dataset names into SQL identifiers.
//!
//! ## Features
//!
//! - **Conventions** - snake_case, camelCase and PascalCase
//! - **Inflection** - pluralized or singularized table names behind the [`Inflector`] trait
//! - **Uniqueness** - `_1`, `_2`, ... suffixes for repeated table and per-table column names
//! - **Normalization** - upper-cased, length-limited headers for flat tables
//!
//! ## Example
//!
//! ```rust,ignore
//! use tabular_sql::naming::{NameGenerator, NamingConvention};
//!
//! let mut names = NameGenerator::new()
//!     .convention(NamingConvention::CamelCase)
//!     .table_prefix("app_");
//!
//! assert_eq!(names.generate_table_name("homeAddress"), "app_homeAddresses");
//! ```

mod convention;
mod generator;
mod inflector;
mod normalizer;

pub use convention::{NamingConvention, is_mixed_case, to_camel_case, to_pascal_case, to_snake_case};
pub use generator::{NameGenerator, NamingOptions};
pub use inflector::{EnglishInflector, Inflector, MixedCaseInflector};
pub use normalizer::Normalizer;
