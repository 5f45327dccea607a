//! Generation options

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::export::DialectKind;
use crate::inference::InferenceConfig;
use crate::naming::{NamingConvention, NamingOptions};

/// Options for one SQL generation run
///
/// # Example
///
/// ```rust
/// use tabular_sql::config::GeneratorOptions;
/// use tabular_sql::export::DialectKind;
///
/// let options = GeneratorOptions::builder()
///     .dialect(DialectKind::Postgres)
///     .table_name("users")
///     .create_table(true)
///     .batch_size(500)
///     .build();
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorOptions {
    /// Target SQL dialect
    pub dialect: DialectKind,
    /// Root table name (default: `data`)
    pub table_name: String,
    /// Emit `CREATE TABLE` statements before the inserts
    pub create_table: bool,
    /// Rows per `INSERT` statement (0 = all rows in one statement)
    pub batch_size: usize,
    /// Normalize column headers on the flat path
    pub normalize_columns: bool,
    /// Naming of generated tables and foreign keys
    pub naming: NamingOptions,
    /// Column type inference
    pub inference: InferenceConfig,
    /// Keep names issued by earlier runs of the same generator reserved
    pub preserve_issued_names: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            dialect: DialectKind::Generic,
            table_name: "data".to_string(),
            create_table: false,
            batch_size: 100,
            normalize_columns: true,
            naming: NamingOptions::default(),
            inference: InferenceConfig::default(),
            preserve_issued_names: false,
        }
    }
}

impl GeneratorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> GeneratorOptionsBuilder {
        GeneratorOptionsBuilder::default()
    }

    /// Check the options before any SQL is produced
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.table_name.trim().is_empty() {
            return Err(ConfigError::EmptyTableName);
        }
        self.inference.validate()
    }

    /// Parse options from TOML text
    #[cfg(feature = "config-file")]
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let options: Self = toml::from_str(text).map_err(|e| ConfigError::File(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a TOML file
    #[cfg(feature = "config-file")]
    pub fn from_toml_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::File(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }
}

/// Builder for GeneratorOptions
#[derive(Debug, Default)]
pub struct GeneratorOptionsBuilder {
    options: GeneratorOptions,
}

impl GeneratorOptionsBuilder {
    pub fn dialect(mut self, dialect: DialectKind) -> Self {
        self.options.dialect = dialect;
        self
    }

    pub fn table_name(mut self, name: impl Into<String>) -> Self {
        self.options.table_name = name.into();
        self
    }

    pub fn create_table(mut self, create: bool) -> Self {
        self.options.create_table = create;
        self
    }

    pub fn batch_size(mut self, size: usize) -> Self {
        self.options.batch_size = size;
        self
    }

    pub fn normalize_columns(mut self, normalize: bool) -> Self {
        self.options.normalize_columns = normalize;
        self
    }

    pub fn naming_convention(mut self, convention: NamingConvention) -> Self {
        self.options.naming.convention = convention;
        self
    }

    pub fn table_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.options.naming.table_prefix = prefix.into();
        self
    }

    pub fn pluralize_tables(mut self, pluralize: bool) -> Self {
        self.options.naming.pluralize_tables = pluralize;
        self
    }

    /// Set the inference agreement threshold (clamped to 0.0 - 1.0)
    pub fn type_threshold(mut self, threshold: f64) -> Self {
        self.options.inference.type_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn inference(mut self, config: InferenceConfig) -> Self {
        self.options.inference = config;
        self
    }

    pub fn preserve_issued_names(mut self, preserve: bool) -> Self {
        self.options.preserve_issued_names = preserve;
        self
    }

    pub fn build(self) -> GeneratorOptions {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = GeneratorOptions::default();
        assert_eq!(options.dialect, DialectKind::Generic);
        assert_eq!(options.table_name, "data");
        assert_eq!(options.batch_size, 100);
        assert!(options.normalize_columns);
        assert!(!options.create_table);
        assert!(options.naming.pluralize_tables);
    }

    #[test]
    fn test_builder() {
        let options = GeneratorOptions::builder()
            .dialect(DialectKind::Mysql)
            .table_prefix("app_")
            .naming_convention(NamingConvention::PascalCase)
            .pluralize_tables(false)
            .type_threshold(3.0)
            .build();
        assert_eq!(options.dialect, DialectKind::Mysql);
        assert_eq!(options.naming.table_prefix, "app_");
        assert_eq!(options.naming.convention, NamingConvention::PascalCase);
        assert!(!options.naming.pluralize_tables);
        assert_eq!(options.inference.type_threshold, 1.0);
    }

    #[test]
    fn test_validate() {
        let blank = GeneratorOptions::builder().table_name("  ").build();
        assert_eq!(blank.validate(), Err(ConfigError::EmptyTableName));
    }

    #[test]
    fn test_deserialize_partial_json() {
        let options: GeneratorOptions =
            serde_json::from_str(r#"{"dialect": "postgresql", "naming": {"tablePrefix": "t_"}}"#).unwrap();
        assert_eq!(options.dialect, DialectKind::Postgres);
        assert_eq!(options.naming.table_prefix, "t_");
        assert_eq!(options.batch_size, 100);
    }

    #[cfg(feature = "config-file")]
    #[test]
    fn test_from_toml() {
        let options = GeneratorOptions::from_toml_str(
            r#"
            dialect = "sqlite"
            tableName = "people"
            batchSize = 10

            [naming]
            convention = "camel"

            [inference]
            typeThreshold = 0.6
            "#,
        )
        .unwrap();
        assert_eq!(options.dialect, DialectKind::Sqlite);
        assert_eq!(options.table_name, "people");
        assert_eq!(options.batch_size, 10);
        assert_eq!(options.naming.convention, NamingConvention::CamelCase);
        assert_eq!(options.inference.type_threshold, 0.6);

        assert!(matches!(
            GeneratorOptions::from_toml_str("dialect = \"db2\""),
            Err(ConfigError::File(_))
        ));
    }
}
