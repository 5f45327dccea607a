//! Column-name normalization for flat tables

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

static INVALID_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z0-9_ ]").unwrap());

/// Normalizes raw column headers into safe SQL identifiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Normalizer {
    /// Maximum identifier length (0 = unlimited)
    pub max_length: usize,
    /// Keep the original letter case instead of upper-casing
    pub preserve_case: bool,
    /// Replace spaces with `space_replacement`
    pub replace_spaces: bool,
    /// Replacement for spaces and invalid characters
    pub space_replacement: String,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            max_length: 64,
            preserve_case: false,
            replace_spaces: true,
            space_replacement: "_".to_string(),
        }
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize a single column name
    pub fn normalize_column_name(&self, name: &str) -> String {
        let mut name = name.trim().to_string();

        let replacement = if self.replace_spaces {
            name = name.replace(' ', &self.space_replacement);
            self.space_replacement.as_str()
        } else {
            "_"
        };
        name = INVALID_CHARS.replace_all(&name, replacement).into_owned();

        if let Some(first) = name.chars().next()
            && !first.is_alphabetic()
            && first != '_'
        {
            name.insert(0, '_');
        }

        if !self.preserve_case {
            name = name.to_uppercase();
        }

        if self.max_length > 0 && name.chars().count() > self.max_length {
            name = name.chars().take(self.max_length).collect();
        }

        if name.is_empty() {
            name = "COLUMN".to_string();
        }
        name
    }

    /// Normalize a list of column names, suffixing repeats with `_0`, `_1`, ...
    pub fn normalize_column_names(&self, names: &[String]) -> Vec<String> {
        let mut used: HashSet<String> = HashSet::new();
        let mut result = Vec::with_capacity(names.len());

        for name in names {
            let normalized = self.normalize_column_name(name);
            let unique = if used.contains(&normalized) {
                (0..)
                    .map(|n| format!("{}_{}", normalized, n))
                    .find(|candidate| !used.contains(candidate))
                    .unwrap_or(normalized)
            } else {
                normalized
            };
            used.insert(unique.clone());
            result.push(unique);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_default_normalization() {
        let n = Normalizer::new();
        assert_eq!(n.normalize_column_name("column"), "COLUMN");
        assert_eq!(n.normalize_column_name("column name"), "COLUMN_NAME");
        assert_eq!(n.normalize_column_name("column-name!"), "COLUMN_NAME_");
        assert_eq!(n.normalize_column_name("123column"), "_123COLUMN");
        assert_eq!(n.normalize_column_name("  column  "), "COLUMN");
        assert_eq!(n.normalize_column_name(""), "COLUMN");
    }

    #[test]
    fn test_custom_settings() {
        let n = Normalizer {
            max_length: 10,
            preserve_case: true,
            replace_spaces: true,
            space_replacement: "-".to_string(),
        };
        assert_eq!(n.normalize_column_name("This is a very long column name"), "This-is-a-");

        let keep_spaces = Normalizer {
            replace_spaces: false,
            ..Normalizer::default()
        };
        assert_eq!(keep_spaces.normalize_column_name("column name"), "COLUMN NAME");

        let short = Normalizer {
            max_length: 5,
            ..Normalizer::default()
        };
        assert_eq!(short.normalize_column_name("column_name"), "COLUM");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let n = Normalizer::new();
        for raw in ["user id", "column-name!", "123column", "Ünïcode name"] {
            let once = n.normalize_column_name(raw);
            assert_eq!(n.normalize_column_name(&once), once);
        }
    }

    #[test]
    fn test_duplicate_names() {
        let n = Normalizer::new();
        assert_eq!(
            n.normalize_column_names(&names(&["id", "id", "id"])),
            names(&["ID", "ID_0", "ID_1"])
        );
        assert_eq!(
            n.normalize_column_names(&names(&["id", "user-name", "123email", ""])),
            names(&["ID", "USER_NAME", "_123EMAIL", "COLUMN"])
        );
    }

    #[test]
    fn test_normalization_collisions_stay_unique() {
        let n = Normalizer::new();
        let result = n.normalize_column_names(&names(&["user-id", "user_id", "userId", "USER_ID_0"]));
        let unique: HashSet<&String> = result.iter().collect();
        assert_eq!(unique.len(), result.len());
    }
}
