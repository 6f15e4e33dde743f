//! Raw database type registry
//!
//! Introspectors see raw type names such as `VARCHAR(255)`, `int unsigned` or
//! `timestamp with time zone`. The registry normalises those names and maps
//! them to a [`SemanticType`]. Raw types nobody registered are reported as
//! [`IntrospectionError::UnknownType`], which is why callers register
//! overrides (for example `enum -> string`) before introspecting.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use super::metadata::{ColumnMetadata, SemanticType};
use super::IntrospectionError;

/// Built-in raw type mappings, keyed by normalised raw type name.
const BUILTIN_MAPPINGS: &[(&str, SemanticType)] = &[
    // Integers
    ("int", SemanticType::Integer),
    ("integer", SemanticType::Integer),
    ("int4", SemanticType::Integer),
    ("mediumint", SemanticType::Integer),
    ("serial", SemanticType::Integer),
    ("bigint", SemanticType::BigInt),
    ("int8", SemanticType::BigInt),
    ("bigserial", SemanticType::BigInt),
    ("smallint", SemanticType::SmallInt),
    ("int2", SemanticType::SmallInt),
    ("smallserial", SemanticType::SmallInt),
    ("year", SemanticType::SmallInt),
    // Booleans
    ("bool", SemanticType::Boolean),
    ("boolean", SemanticType::Boolean),
    ("tinyint", SemanticType::Boolean),
    ("bit", SemanticType::Boolean),
    // Strings
    ("varchar", SemanticType::String),
    ("character varying", SemanticType::String),
    ("char", SemanticType::String),
    ("character", SemanticType::String),
    ("nvarchar", SemanticType::String),
    ("nchar", SemanticType::String),
    ("varchar2", SemanticType::String),
    ("string", SemanticType::String),
    ("set", SemanticType::SimpleArray),
    ("text", SemanticType::Text),
    ("tinytext", SemanticType::Text),
    ("mediumtext", SemanticType::Text),
    ("longtext", SemanticType::Text),
    ("ntext", SemanticType::Text),
    ("clob", SemanticType::Text),
    ("", SemanticType::Text),
    // Binary
    ("binary", SemanticType::Binary),
    ("varbinary", SemanticType::Binary),
    ("blob", SemanticType::Blob),
    ("tinyblob", SemanticType::Blob),
    ("mediumblob", SemanticType::Blob),
    ("longblob", SemanticType::Blob),
    ("bytea", SemanticType::Blob),
    ("image", SemanticType::Blob),
    // Numerics
    ("decimal", SemanticType::Decimal),
    ("numeric", SemanticType::Decimal),
    ("money", SemanticType::Decimal),
    ("float", SemanticType::Float),
    ("double", SemanticType::Float),
    ("double precision", SemanticType::Float),
    ("real", SemanticType::Float),
    ("float4", SemanticType::Float),
    ("float8", SemanticType::Float),
    // Temporal
    ("date", SemanticType::Date),
    ("datetime", SemanticType::DateTime),
    ("datetime2", SemanticType::DateTime),
    ("smalldatetime", SemanticType::DateTime),
    ("timestamp", SemanticType::DateTime),
    ("timestamp without time zone", SemanticType::DateTime),
    ("timestamptz", SemanticType::DateTimeTz),
    ("timestamp with time zone", SemanticType::DateTimeTz),
    ("datetimeoffset", SemanticType::DateTimeTz),
    ("time", SemanticType::Time),
    ("time without time zone", SemanticType::Time),
    ("timetz", SemanticType::Time),
    ("time with time zone", SemanticType::Time),
    ("interval", SemanticType::DateInterval),
    // Structured
    ("json", SemanticType::Json),
    ("jsonb", SemanticType::Json),
    ("uuid", SemanticType::Guid),
    ("uniqueidentifier", SemanticType::Guid),
];

/// Raw types whose columns are implicitly auto-incrementing.
const SERIAL_TYPES: &[&str] = &["serial", "bigserial", "smallserial"];

static TYPE_ARGUMENTS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\((\d+)(?:\s*,\s*(\d+))?\)").expect("Invalid type argument regex"));

static TYPE_SUFFIXES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+(unsigned|signed|zerofill)\b").expect("Invalid suffix regex"));

/// Length or precision/scale arguments parsed from a raw type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeArguments {
    pub first: Option<u32>,
    pub second: Option<u32>,
}

/// Maps raw database type names to semantic types.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    mappings: HashMap<String, SemanticType>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self {
            mappings: BUILTIN_MAPPINGS
                .iter()
                .map(|(raw, ty)| (raw.to_string(), *ty))
                .collect(),
        }
    }
}

impl TypeRegistry {
    /// Map `raw_type` to `semantic`.
    ///
    /// Fails with [`IntrospectionError::TypeAlreadyRegistered`] when the raw
    /// type already has a mapping; the existing mapping is kept.
    pub fn register(
        &mut self,
        raw_type: &str,
        semantic: SemanticType,
    ) -> Result<(), IntrospectionError> {
        let key = normalize_raw_type(raw_type);
        if self.mappings.contains_key(&key) {
            return Err(IntrospectionError::TypeAlreadyRegistered { raw_type: key });
        }
        self.mappings.insert(key, semantic);
        Ok(())
    }

    pub fn is_registered(&self, raw_type: &str) -> bool {
        self.mappings.contains_key(&normalize_raw_type(raw_type))
    }

    /// Resolve a raw type reported for `column`.
    pub fn resolve(&self, raw_type: &str, column: &str) -> Result<SemanticType, IntrospectionError> {
        let key = normalize_raw_type(raw_type);
        self.mappings
            .get(&key)
            .copied()
            .ok_or_else(|| IntrospectionError::UnknownType {
                raw_type: key,
                column: column.to_string(),
            })
    }
}

/// Lowercase a raw type and strip its argument list and sign modifiers.
///
/// `VARCHAR(255)` -> `varchar`, `INT(11) UNSIGNED` -> `int`,
/// `ENUM('a', 'b')` -> `enum`, `Timestamp With Time Zone` stays multi-word.
pub fn normalize_raw_type(raw_type: &str) -> String {
    let without_args = strip_argument_list(raw_type);
    let without_suffixes = TYPE_SUFFIXES.replace_all(&without_args, "");
    without_suffixes
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Remove the first parenthesised argument list. Parentheses inside quoted
/// values (`ENUM('a)', 'b')`) do not close it.
fn strip_argument_list(raw_type: &str) -> String {
    let Some(open) = raw_type.find('(') else {
        return raw_type.to_string();
    };

    let mut in_quote = false;
    let mut close = raw_type.len();
    for (i, ch) in raw_type[open..].char_indices() {
        match ch {
            '\'' => in_quote = !in_quote,
            ')' if !in_quote => {
                close = open + i + 1;
                break;
            }
            _ => {}
        }
    }
    format!("{}{}", &raw_type[..open], &raw_type[close..])
}

/// Parse `(n)` or `(p, s)` from a raw type such as `DECIMAL(10, 2)`.
pub fn parse_type_arguments(raw_type: &str) -> TypeArguments {
    TYPE_ARGUMENTS
        .captures(raw_type)
        .map(|caps| TypeArguments {
            first: caps.get(1).and_then(|m| m.as_str().parse().ok()),
            second: caps.get(2).and_then(|m| m.as_str().parse().ok()),
        })
        .unwrap_or_default()
}

pub fn is_serial_type(raw_type: &str) -> bool {
    SERIAL_TYPES.contains(&normalize_raw_type(raw_type).as_str())
}

/// A column as reported by a driver, before its raw type is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawColumn {
    pub name: String,
    pub raw_type: String,
    pub nullable: bool,
    pub default: Option<String>,
    pub autoincrement: bool,
}

impl RawColumn {
    /// Resolve the raw type and derive length/precision/scale from its
    /// arguments.
    pub fn resolve(&self, registry: &TypeRegistry) -> Result<ColumnMetadata, IntrospectionError> {
        let semantic_type = registry.resolve(&self.raw_type, &self.name)?;
        let args = parse_type_arguments(&self.raw_type);

        let (length, precision, scale) = match semantic_type {
            SemanticType::Decimal => (None, args.first, args.second),
            SemanticType::String | SemanticType::AsciiString | SemanticType::Binary => {
                (args.first, None, None)
            }
            _ => (None, None, None),
        };

        Ok(ColumnMetadata {
            name: self.name.clone(),
            semantic_type,
            nullable: self.nullable,
            length,
            precision,
            scale,
            default: self.default.clone(),
            autoincrement: self.autoincrement || is_serial_type(&self.raw_type),
        })
    }
}
