//! Type inference engine for dataset columns
//!
//! Classifies column samples into canonical SQL types.
//!
//! ## Features
//!
//! - **Value classification** - native numbers and booleans, numeric strings, boolean tokens
//! - **Date detection** - ISO, US and UK calendar layouts plus RFC 3339 timestamps
//! - **Threshold decisions** - a configurable fraction of the sample must agree on a type
//! - **Strict text policy** - any unclassifiable value forces TEXT at the default threshold
//!
//! ## Example
//!
//! ```rust,ignore
//! use tabular_sql::inference::{InferenceConfig, TypeInferenceEngine};
//!
//! let engine = TypeInferenceEngine::with_config(
//!     InferenceConfig::builder().type_threshold(0.6).build(),
//! );
//! let types = engine.infer_column_types(&dataset.columns, &dataset.rows);
//! ```

mod config;
mod engine;
mod formats;

pub use config::{InferenceConfig, InferenceConfigBuilder, RFC3339, default_date_formats};
pub use engine::{TypeCounts, TypeInferenceEngine};
pub use formats::{ValueClass, ValueClassifier, detect_date, is_boolean_like, is_boolean_token};
