//! Pluralization and singularization strategies

use once_cell::sync::Lazy;
use regex::Regex;

/// Pluralization interface used by the name generator
pub trait Inflector: Send + Sync {
    fn pluralize(&self, word: &str) -> String;
    fn singularize(&self, word: &str) -> String;
}

/// Rule-table English inflection (regular suffixes, irregulars, uncountables)
///
/// Only the last word of a compound name (`user_address`, `homeAddress`)
/// is inflected.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishInflector;

/// Inflection for names that are already mixed-case (`homeAddress`)
///
/// Keeps the fixed outputs callers rely on: a trailing `Address` becomes
/// `Addresses`, a lowercase `y` after an upper-case letter becomes `ies`,
/// and everything else gains an `s`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MixedCaseInflector;

const UNCOUNTABLE: &[&str] = &[
    "data",
    "equipment",
    "fish",
    "information",
    "jeans",
    "metadata",
    "money",
    "police",
    "rice",
    "series",
    "sheep",
    "species",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("child", "children"),
    ("foot", "feet"),
    ("goose", "geese"),
    ("man", "men"),
    ("move", "moves"),
    ("person", "people"),
    ("sex", "sexes"),
    ("tooth", "teeth"),
    ("woman", "women"),
    ("zombie", "zombies"),
];

fn compile(rules: &[(&str, &'static str)]) -> Vec<(Regex, &'static str)> {
    rules
        .iter()
        .map(|(pattern, replacement)| (Regex::new(pattern).unwrap(), *replacement))
        .collect()
}

// Evaluated top to bottom; the first match wins.
static PLURAL_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    compile(&[
        (r"(?i)(quiz)$", "${1}zes"),
        (r"(?i)^(oxen)$", "${1}"),
        (r"(?i)^(ox)$", "${1}en"),
        (r"(?i)([ml])ice$", "${1}ice"),
        (r"(?i)([ml])ouse$", "${1}ice"),
        (r"(?i)(matr|vert|ind)(?:ix|ex)$", "${1}ices"),
        (r"(?i)(x|ch|ss|sh)$", "${1}es"),
        (r"(?i)([^aeiouy]|qu)y$", "${1}ies"),
        (r"(?i)(hive)$", "${1}s"),
        (r"(?i)(?:([^f])fe|([lr])f)$", "${1}${2}ves"),
        (r"(?i)sis$", "ses"),
        (r"(?i)([ti])a$", "${1}a"),
        (r"(?i)([ti])um$", "${1}a"),
        (r"(?i)(buffal|tomat|her|potat)o$", "${1}oes"),
        (r"(?i)(bu)s$", "${1}ses"),
        (r"(?i)(alias|status)$", "${1}es"),
        (r"(?i)(octop|vir)(?:us|i)$", "${1}i"),
        (r"(?i)(ax|test)is$", "${1}es"),
        (r"(?i)s$", "s"),
        (r"$", "s"),
    ])
});

static SINGULAR_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    compile(&[
        (r"(?i)(database)s$", "${1}"),
        (r"(?i)(quiz)zes$", "${1}"),
        (r"(?i)(matr)ices$", "${1}ix"),
        (r"(?i)(vert|ind)ices$", "${1}ex"),
        (r"(?i)^(ox)en$", "${1}"),
        (r"(?i)(alias|status)(?:es)?$", "${1}"),
        (r"(?i)(octop|vir)(?:us|i)$", "${1}us"),
        (r"(?i)^(a)x[ie]s$", "${1}xis"),
        (r"(?i)(cris|test)(?:is|es)$", "${1}is"),
        (r"(?i)(shoe)s$", "${1}"),
        (r"(?i)(o)es$", "${1}"),
        (r"(?i)(bus)(?:es)?$", "${1}"),
        (r"(?i)([ml])ice$", "${1}ouse"),
        (r"(?i)(x|ch|ss|sh)es$", "${1}"),
        (r"(?i)(m)ovies$", "${1}ovie"),
        (r"(?i)([^aeiouy]|qu)ies$", "${1}y"),
        (r"(?i)([lr])ves$", "${1}f"),
        (r"(?i)(tive)s$", "${1}"),
        (r"(?i)(hive)s$", "${1}"),
        (r"(?i)([^f])ves$", "${1}fe"),
        (r"(?i)(analy|ba|diagno|parenthe|progno|synop|the)(?:sis|ses)$", "${1}sis"),
        (r"(?i)([ti])a$", "${1}um"),
        (r"(?i)(n)ews$", "${1}ews"),
        (r"(?i)(ss)$", "${1}"),
        (r"(?i)s$", ""),
    ])
});

/// Split `word` into everything before its last word and the last word
fn split_last_word(word: &str) -> (&str, &str) {
    let boundary = word
        .char_indices()
        .rev()
        .find(|(i, c)| *c == '_' || (*i > 0 && c.is_uppercase()));
    match boundary {
        Some((i, '_')) => (&word[..=i], &word[i + 1..]),
        Some((i, _)) => (&word[..i], &word[i..]),
        None => ("", word),
    }
}

/// Copy the case of `like`'s first letter onto `word`
fn match_initial_case(word: &str, like: &str) -> String {
    let upper = like.chars().next().is_some_and(|c| c.is_uppercase());
    let mut chars = word.chars();
    match chars.next() {
        Some(first) if upper => first.to_uppercase().chain(chars).collect(),
        _ => word.to_string(),
    }
}

impl EnglishInflector {
    fn inflect(
        word: &str,
        rules: &[(Regex, &'static str)],
        irregular: impl Fn(&str) -> Option<&'static str>,
    ) -> String {
        if word.is_empty() {
            return String::new();
        }

        let (head, last) = split_last_word(word);
        let lower = last.to_lowercase();
        if UNCOUNTABLE.contains(&lower.as_str()) {
            return word.to_string();
        }
        if let Some(replacement) = irregular(&lower) {
            return format!("{}{}", head, match_initial_case(replacement, last));
        }

        for (pattern, replacement) in rules {
            if pattern.is_match(word) {
                return pattern.replace(word, *replacement).into_owned();
            }
        }
        word.to_string()
    }
}

impl Inflector for EnglishInflector {
    fn pluralize(&self, word: &str) -> String {
        Self::inflect(word, &PLURAL_RULES, |w| {
            IRREGULAR
                .iter()
                .find(|(singular, plural)| *singular == w || *plural == w)
                .map(|(_, plural)| *plural)
        })
    }

    fn singularize(&self, word: &str) -> String {
        Self::inflect(word, &SINGULAR_RULES, |w| {
            IRREGULAR
                .iter()
                .find(|(singular, plural)| *plural == w || *singular == w)
                .map(|(singular, _)| *singular)
        })
    }
}

impl Inflector for MixedCaseInflector {
    fn pluralize(&self, word: &str) -> String {
        if word.ends_with("Address") || word.ends_with("address") {
            return format!("{}es", word);
        }

        let mut tail = word.chars().rev();
        if let (Some('y'), Some(prev)) = (tail.next(), tail.next())
            && prev.is_uppercase()
        {
            return format!("{}ies", &word[..word.len() - 1]);
        }
        format!("{}s", word)
    }

    fn singularize(&self, word: &str) -> String {
        if word.ends_with("Addresses") || word.ends_with("addresses") {
            return word[..word.len() - 2].to_string();
        }
        if let Some(stem) = word.strip_suffix("ies") {
            return format!("{}y", stem);
        }
        word.strip_suffix('s').unwrap_or(word).to_string()
    }
}
