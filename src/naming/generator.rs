//! Unique table and column name generation

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use super::convention::{NamingConvention, is_mixed_case};
use super::inflector::{EnglishInflector, Inflector, MixedCaseInflector};

/// Naming configuration shared by all generators of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NamingOptions {
    /// Convention applied to table and foreign-key column names
    pub convention: NamingConvention,
    /// Prefix concatenated onto every table name after inflection
    pub table_prefix: String,
    /// Pluralize table names (singularize when false)
    pub pluralize_tables: bool,
}

impl Default for NamingOptions {
    fn default() -> Self {
        Self {
            convention: NamingConvention::SnakeCase,
            table_prefix: String::new(),
            pluralize_tables: true,
        }
    }
}

/// Issues unique table and column names for one analysis run
///
/// Table names and column names live in separate namespaces; column names
/// are only unique within their table. Collisions get `_1`, `_2`, ...
///
/// # Example
///
/// ```rust
/// use tabular_sql::naming::NameGenerator;
///
/// let mut names = NameGenerator::new();
/// assert_eq!(names.generate_table_name("user"), "users");
/// assert_eq!(names.generate_table_name("user"), "users_1");
/// assert_eq!(names.generate_foreign_key_column_name("users", "addresses"), "address_id");
/// ```
pub struct NameGenerator {
    options: NamingOptions,
    used_tables: HashSet<String>,
    used_columns: HashSet<String>,
    english: EnglishInflector,
    mixed_case: MixedCaseInflector,
}

impl Default for NameGenerator {
    fn default() -> Self {
        Self::with_options(NamingOptions::default())
    }
}

impl NameGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: NamingOptions) -> Self {
        Self {
            options,
            used_tables: HashSet::new(),
            used_columns: HashSet::new(),
            english: EnglishInflector,
            mixed_case: MixedCaseInflector,
        }
    }

    /// Set the naming convention (call before the first generated name)
    pub fn convention(mut self, convention: NamingConvention) -> Self {
        self.options.convention = convention;
        self
    }

    /// Set the table prefix (call before the first generated name)
    pub fn table_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.options.table_prefix = prefix.into();
        self
    }

    /// Pluralize or singularize table names (call before the first generated name)
    pub fn pluralize_tables(mut self, pluralize: bool) -> Self {
        self.options.pluralize_tables = pluralize;
        self
    }

    pub fn options(&self) -> &NamingOptions {
        &self.options
    }

    /// Fresh generator with the same configuration and no issued names
    pub fn fresh(&self) -> Self {
        Self::with_options(self.options.clone())
    }

    fn keeps_mixed_case(&self, base: &str) -> bool {
        self.options.convention != NamingConvention::SnakeCase && is_mixed_case(base)
    }

    fn inflector_for(&self, name: &str) -> &dyn Inflector {
        if self.keeps_mixed_case(name) {
            &self.mixed_case
        } else {
            &self.english
        }
    }

    /// Generate a unique table name from a field or dataset name
    pub fn generate_table_name(&mut self, base: &str) -> String {
        let converted = self.options.convention.apply(base);
        let inflector = self.inflector_for(base);
        let inflected = if self.options.pluralize_tables {
            inflector.pluralize(&converted)
        } else {
            inflector.singularize(&converted)
        };
        let prefixed = format!("{}{}", self.options.table_prefix, inflected);

        let name = first_free(&prefixed, |candidate| self.used_tables.contains(candidate));
        self.used_tables.insert(name.clone());
        debug!(base, table = %name, "Generated table name");
        name
    }

    /// Generate a column name unique within `table`
    pub fn generate_column_name(&mut self, table: &str, base: &str) -> String {
        let converted = self.options.convention.apply(base);
        let name = first_free(&converted, |candidate| {
            self.used_columns.contains(&column_key(table, candidate))
        });
        self.used_columns.insert(column_key(table, &name));
        name
    }

    /// Mark a column name on `table` as taken without converting it
    pub fn reserve_column_name(&mut self, table: &str, name: &str) {
        self.used_columns.insert(column_key(table, name));
    }

    /// Generate the column on `table` that references `ref_table`
    ///
    /// The base is the singular form of the referenced table (without the
    /// table prefix) followed by `_id`.
    pub fn generate_foreign_key_column_name(&mut self, table: &str, ref_table: &str) -> String {
        let unprefixed = ref_table
            .strip_prefix(self.options.table_prefix.as_str())
            .filter(|rest| !rest.is_empty())
            .unwrap_or(ref_table);
        let singular = self.inflector_for(unprefixed).singularize(unprefixed);
        let base = format!("{}_id", singular);
        self.generate_column_name(table, &base)
    }
}

fn column_key(table: &str, column: &str) -> String {
    format!("{}.{}", table, column)
}

/// `name` itself, or `name_N` for the smallest N >= 1 not yet taken
fn first_free(name: &str, taken: impl Fn(&str) -> bool) -> String {
    if !taken(name) {
        return name.to_string();
    }
    (1..)
        .map(|n| format!("{}_{}", name, n))
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_table_names_pluralized() {
        let mut g = NameGenerator::new();
        assert_eq!(g.generate_table_name("address"), "addresses");
        assert_eq!(g.generate_table_name("geo"), "geos");
        assert_eq!(g.generate_table_name("firstName"), "first_names");
    }

    #[test]
    fn test_table_name_uniqueness() {
        let mut g = NameGenerator::new();
        assert_eq!(g.generate_table_name("users"), "users");
        assert_eq!(g.generate_table_name("users"), "users_1");
        assert_eq!(g.generate_table_name("user"), "users_2");
    }

    #[test]
    fn test_singular_tables() {
        let mut g = NameGenerator::new().pluralize_tables(false);
        assert_eq!(g.generate_table_name("companies"), "company");
        assert_eq!(g.generate_table_name("users"), "user");
    }

    #[test]
    fn test_camel_case_with_prefix() {
        let mut g = NameGenerator::new()
            .convention(NamingConvention::CamelCase)
            .table_prefix("app_");
        assert_eq!(g.generate_table_name("users"), "app_users");
        assert_eq!(g.generate_table_name("homeAddress"), "app_homeAddresses");
    }

    #[test]
    fn test_mixed_case_table_names_keep_their_casing() {
        let mut g = NameGenerator::new().convention(NamingConvention::CamelCase);
        assert_eq!(g.generate_table_name("HomeAddress"), "HomeAddresses");
        let mut g = NameGenerator::new().convention(NamingConvention::PascalCase);
        assert_eq!(g.generate_table_name("homeAddress"), "homeAddresses");
        assert_eq!(g.generate_table_name("order_items"), "OrderItems");
    }

    #[test]
    fn test_column_names_scoped_per_table() {
        let mut g = NameGenerator::new();
        assert_eq!(g.generate_column_name("users", "address_id"), "address_id");
        assert_eq!(g.generate_column_name("users", "address_id"), "address_id_1");
        assert_eq!(g.generate_column_name("orders", "address_id"), "address_id");
    }

    #[test]
    fn test_reserved_columns_are_skipped() {
        let mut g = NameGenerator::new();
        g.reserve_column_name("users", "address_id");
        assert_eq!(g.generate_foreign_key_column_name("users", "addresses"), "address_id_1");
    }

    #[test]
    fn test_tables_and_columns_are_separate_namespaces() {
        let mut g = NameGenerator::new();
        assert_eq!(g.generate_table_name("geos"), "geos");
        assert_eq!(g.generate_column_name("geos", "geos"), "geos");
    }

    #[test]
    fn test_foreign_key_column_names() {
        let mut g = NameGenerator::new();
        assert_eq!(g.generate_foreign_key_column_name("users", "addresses"), "address_id");
        assert_eq!(g.generate_foreign_key_column_name("users", "companies"), "company_id");
        assert_eq!(g.generate_foreign_key_column_name("users", "addresses"), "address_id_1");
    }

    #[test]
    fn test_foreign_key_column_strips_prefix() {
        let mut g = NameGenerator::new()
            .convention(NamingConvention::CamelCase)
            .table_prefix("app_");
        assert_eq!(
            g.generate_foreign_key_column_name("app_users", "app_homeAddresses"),
            "homeAddressId"
        );
    }

    #[test]
    fn test_fresh_keeps_configuration() {
        let mut g = NameGenerator::new().table_prefix("t_");
        assert_eq!(g.generate_table_name("user"), "t_users");
        let mut fresh = g.fresh();
        assert_eq!(fresh.generate_table_name("user"), "t_users");
        assert_eq!(fresh.options().table_prefix, "t_");
    }
}
