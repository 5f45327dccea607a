//! Identifier naming conventions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Naming convention applied to generated table and column names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NamingConvention {
    #[default]
    #[serde(rename = "snake", alias = "snake_case")]
    SnakeCase,
    #[serde(rename = "camel", alias = "camelCase")]
    CamelCase,
    #[serde(rename = "pascal", alias = "PascalCase")]
    PascalCase,
}

impl NamingConvention {
    /// Apply the convention to an identifier
    pub fn apply(&self, name: &str) -> String {
        match self {
            NamingConvention::SnakeCase => to_snake_case(name),
            NamingConvention::CamelCase => to_camel_case(name),
            NamingConvention::PascalCase => to_pascal_case(name),
        }
    }
}

impl fmt::Display for NamingConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamingConvention::SnakeCase => write!(f, "snake"),
            NamingConvention::CamelCase => write!(f, "camel"),
            NamingConvention::PascalCase => write!(f, "pascal"),
        }
    }
}

impl FromStr for NamingConvention {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', '-'], "").as_str() {
            "snake" | "snakecase" => Ok(NamingConvention::SnakeCase),
            "camel" | "camelcase" => Ok(NamingConvention::CamelCase),
            "pascal" | "pascalcase" => Ok(NamingConvention::PascalCase),
            _ => Err(ConfigError::UnknownNamingConvention(s.to_string())),
        }
    }
}

/// Whether `name` is a single already-cased identifier such as `homeAddress`
pub fn is_mixed_case(name: &str) -> bool {
    !name.is_empty()
        && name.chars().all(|c| c.is_ascii_alphanumeric())
        && name.chars().any(|c| c.is_ascii_uppercase())
        && name.chars().any(|c| c.is_ascii_lowercase())
}

/// Lowercase, underscore-joined form of `name`
///
/// Non-alphanumeric characters and lower-to-upper case humps become word
/// boundaries. Applying it twice yields the same result.
pub fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            out.push('_');
            continue;
        }
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_numeric() || (prev.is_uppercase() && next_is_lower) {
                out.push('_');
            }
        }
        out.extend(c.to_lowercase());
    }

    let mut collapsed = String::with_capacity(out.len());
    for c in out.chars() {
        if c == '_' && collapsed.ends_with('_') {
            continue;
        }
        collapsed.push(c);
    }
    collapsed.trim_matches('_').to_string()
}

/// camelCase form of `name`; mixed-case input is returned verbatim
pub fn to_camel_case(name: &str) -> String {
    if is_mixed_case(name) {
        return name.to_string();
    }

    let snake = to_snake_case(name);
    let mut out = String::with_capacity(snake.len());
    for (i, part) in snake.split('_').filter(|p| !p.is_empty()).enumerate() {
        if i == 0 {
            out.push_str(part);
        } else {
            out.push_str(&upper_first(part));
        }
    }
    out
}

/// PascalCase form of `name`; mixed-case input is returned verbatim
pub fn to_pascal_case(name: &str) -> String {
    if is_mixed_case(name) {
        return name.to_string();
    }
    upper_first(&to_camel_case(name))
}

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_case() {
        assert_eq!(to_snake_case("firstName"), "first_name");
        assert_eq!(to_snake_case("First Name"), "first_name");
        assert_eq!(to_snake_case("user--id"), "user_id");
        assert_eq!(to_snake_case("_private_"), "private");
        assert_eq!(to_snake_case("HTTPServer"), "http_server");
        assert_eq!(to_snake_case("address2Line"), "address2_line");
    }

    #[test]
    fn test_snake_case_idempotent() {
        for name in ["firstName", "HTTPServer", "a b c", "already_snake"] {
            let once = to_snake_case(name);
            assert_eq!(to_snake_case(&once), once);
        }
    }

    #[test]
    fn test_camel_and_pascal() {
        assert_eq!(to_camel_case("first_name"), "firstName");
        assert_eq!(to_camel_case("homeAddress"), "homeAddress");
        assert_eq!(to_camel_case("HomeAddress"), "HomeAddress");
        assert_eq!(to_camel_case("users"), "users");
        assert_eq!(to_pascal_case("first_name"), "FirstName");
        assert_eq!(to_pascal_case("users"), "Users");
        assert_eq!(to_pascal_case("homeAddress"), "homeAddress");
    }

    #[test]
    fn test_mixed_case_detection() {
        assert!(is_mixed_case("homeAddress"));
        assert!(!is_mixed_case("users"));
        assert!(!is_mixed_case("USERS"));
        assert!(!is_mixed_case("home_Address"));
    }

    #[test]
    fn test_parse_convention() {
        assert_eq!("snake_case".parse::<NamingConvention>().unwrap(), NamingConvention::SnakeCase);
        assert_eq!("Camel".parse::<NamingConvention>().unwrap(), NamingConvention::CamelCase);
        assert_eq!("pascal-case".parse::<NamingConvention>().unwrap(), NamingConvention::PascalCase);
        assert!("kebab".parse::<NamingConvention>().is_err());
    }
}
