//! Identifier normalisation
//!
//! Raw table and column names arrive in any convention (`user_profile`,
//! `ProductCategory`, `HTTPServer`, `userID`). Everything here first splits
//! a name into lowercase words and then recombines them into class names,
//! namespace segments and property names.

use std::collections::HashSet;
use std::fmt;

/// Fallback namespace segment when a table name yields no words.
pub const FALLBACK_NAMESPACE_SEGMENT: &str = "Others";

/// Fallback class name when a table name yields nothing usable.
pub const FALLBACK_CLASS_NAME: &str = "Entity";

/// Naming convention detected on a raw identifier. Diagnostic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamingStyle {
    Unknown,
    SnakeCase,
    Lowercase,
    CamelCase,
    PascalCase,
}

impl fmt::Display for NamingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NamingStyle::Unknown => "unknown",
            NamingStyle::SnakeCase => "snake_case",
            NamingStyle::Lowercase => "lowercase",
            NamingStyle::CamelCase => "camelCase",
            NamingStyle::PascalCase => "PascalCase",
        };
        f.write_str(name)
    }
}

/// Class and namespace naming derived from a table name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingResult {
    pub class_name: String,
    pub namespace_segment: String,
    pub naming_style: NamingStyle,
    pub words: Vec<String>,
}

/// Split an identifier into lowercase words.
///
/// Names containing an underscore are split on runs of underscores. Other
/// names are split on case boundaries, keeping acronyms together:
/// `HTTPServer` -> `["http", "server"]`.
pub fn words_of(identifier: &str) -> Vec<String> {
    if identifier.is_empty() {
        return Vec::new();
    }

    if identifier.contains('_') {
        return identifier
            .split('_')
            .filter(|part| !part.is_empty())
            .map(|part| part.to_lowercase())
            .collect();
    }

    let words: Vec<String> = case_boundary_fragments(identifier)
        .into_iter()
        .map(|part| part.to_lowercase())
        .collect();

    if words.is_empty() {
        vec![identifier.to_lowercase()]
    } else {
        words
    }
}

/// Scan for fragments that are either an optional uppercase letter followed
/// by lowercase letters/digits, or a run of uppercase letters that is not
/// followed by a lowercase letter/digit. Characters matching neither are
/// skipped.
fn case_boundary_fragments(identifier: &str) -> Vec<&str> {
    let bytes = identifier.as_bytes();
    let is_tail = |b: u8| b.is_ascii_lowercase() || b.is_ascii_digit();
    let mut fragments = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let start = i;

        // Optional capital followed by a lowercase/digit run.
        let tail_start = if bytes[i].is_ascii_uppercase() { i + 1 } else { i };
        if tail_start < bytes.len() && is_tail(bytes[tail_start]) {
            let mut end = tail_start;
            while end < bytes.len() && is_tail(bytes[end]) {
                end += 1;
            }
            fragments.push(&identifier[start..end]);
            i = end;
            continue;
        }

        // Uppercase run, giving back its last letter when that letter starts
        // the next capitalised word.
        if bytes[i].is_ascii_uppercase() {
            let mut run_end = i;
            while run_end < bytes.len() && bytes[run_end].is_ascii_uppercase() {
                run_end += 1;
            }
            let mut end = run_end;
            while end > start && end < bytes.len() && is_tail(bytes[end]) {
                end -= 1;
            }
            if end > start {
                fragments.push(&identifier[start..end]);
                i = end;
                continue;
            }
        }

        i += 1;
        while i < bytes.len() && !identifier.is_char_boundary(i) {
            i += 1;
        }
    }

    fragments
}

/// Uppercase the first character of every word and concatenate.
pub fn to_pascal<S: AsRef<str>>(words: &[S]) -> String {
    words
        .iter()
        .map(|w| ucfirst(&w.as_ref().to_lowercase()))
        .collect()
}

/// Lowercase the first word, uppercase-first the rest, concatenate.
pub fn to_camel<S: AsRef<str>>(words: &[S]) -> String {
    let mut iter = words.iter();
    let Some(first) = iter.next() else {
        return String::new();
    };

    let mut camel = first.as_ref().to_lowercase();
    for word in iter {
        camel.push_str(&ucfirst(&word.as_ref().to_lowercase()));
    }
    camel
}

/// Uppercase the first character of `s`.
pub fn ucfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn detect_naming_style(name: &str) -> NamingStyle {
    let Some(first) = name.chars().next() else {
        return NamingStyle::Unknown;
    };

    if name.contains('_') {
        NamingStyle::SnakeCase
    } else if name == name.to_lowercase() {
        NamingStyle::Lowercase
    } else if !first.is_uppercase() {
        NamingStyle::CamelCase
    } else {
        NamingStyle::PascalCase
    }
}

/// Derive class name and namespace segment for a table.
///
/// Multi-word tables are grouped under the namespace of their first word
/// (`user_profile` -> `User\UserProfile`); single-word tables get their own
/// segment (`tbl` -> `Tbl\Tbl`).
pub fn resolve_table_naming(table_name: &str) -> NamingResult {
    let mut words = words_of(table_name);
    if words.is_empty() {
        words = vec![table_name.to_lowercase()];
    }

    let mut class_name = to_pascal(&words);
    if class_name.is_empty() {
        class_name = ucfirst(table_name);
    }
    if class_name.is_empty() {
        class_name = FALLBACK_CLASS_NAME.to_string();
    }

    let namespace_words = if words.len() > 1 { &words[..1] } else { &words[..] };
    let mut namespace_segment = to_pascal(namespace_words);
    if namespace_segment.is_empty() {
        namespace_segment = FALLBACK_NAMESPACE_SEGMENT.to_string();
    }

    NamingResult {
        class_name,
        namespace_segment,
        naming_style: detect_naming_style(table_name),
        words,
    }
}

/// camelCase property name for a scalar column.
pub fn column_property_name(column_name: &str) -> String {
    let words = words_of(column_name);
    if words.is_empty() {
        return column_name.to_string();
    }

    let property = to_camel(&words);
    if property.is_empty() {
        column_name.to_string()
    } else {
        property
    }
}

/// camelCase property name for a foreign key column, without a trailing
/// `id` word: `user_id` -> `user`, `authorId` -> `author`.
pub fn foreign_key_property_name(column_name: &str) -> String {
    let mut words = words_of(column_name);
    if words.last().is_some_and(|w| w == "id") {
        words.pop();
    }
    if words.is_empty() {
        words = words_of(column_name);
    }

    let property = to_camel(&words);
    if property.is_empty() {
        column_name.to_string()
    } else {
        property
    }
}

/// Join a base namespace and a segment with a single backslash.
pub fn build_namespace(base: &str, segment: &str) -> String {
    let base = base.trim_matches('\\');
    let segment = segment.trim_matches('\\');

    match (base.is_empty(), segment.is_empty()) {
        (_, true) => base.to_string(),
        (true, false) => segment.to_string(),
        (false, false) => format!("{}\\{}", base, segment),
    }
}

/// Property names already taken within one entity.
///
/// Association and scalar properties share this namespace. The first claim
/// of a name keeps it; later claims get a numeric suffix starting at 2.
#[derive(Debug, Default, Clone)]
pub struct PropertyNames {
    used: HashSet<String>,
}

impl PropertyNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&mut self, base_name: &str) -> String {
        let candidate = if base_name.is_empty() {
            "property"
        } else {
            base_name
        };

        let mut unique = candidate.to_string();
        let mut suffix = 1;
        while self.used.contains(&unique) {
            suffix += 1;
            unique = format!("{}{}", candidate, suffix);
        }

        self.used.insert(unique.clone());
        unique
    }

    pub fn is_used(&self, name: &str) -> bool {
        self.used.contains(name)
    }
}
