//! Schema metadata element types

use std::fmt;
use std::str::FromStr;

/// Semantic column type reported by an introspector.
///
/// Raw database types (`varchar`, `int4`, `timestamptz`, ...) are resolved to
/// one of these through a [`TypeRegistry`](super::TypeRegistry) before they
/// reach the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticType {
    AsciiString,
    BigInt,
    Binary,
    Blob,
    Boolean,
    Date,
    DateImmutable,
    DateTime,
    DateTimeImmutable,
    DateTimeTz,
    DateTimeTzImmutable,
    DateInterval,
    Decimal,
    Float,
    Guid,
    Integer,
    Json,
    SimpleArray,
    SmallInt,
    String,
    Text,
    Time,
    TimeImmutable,
}

impl SemanticType {
    /// Canonical lowercase name, as used in type overrides and settings.
    pub fn name(&self) -> &'static str {
        match self {
            SemanticType::AsciiString => "ascii_string",
            SemanticType::BigInt => "bigint",
            SemanticType::Binary => "binary",
            SemanticType::Blob => "blob",
            SemanticType::Boolean => "boolean",
            SemanticType::Date => "date",
            SemanticType::DateImmutable => "date_immutable",
            SemanticType::DateTime => "datetime",
            SemanticType::DateTimeImmutable => "datetime_immutable",
            SemanticType::DateTimeTz => "datetimetz",
            SemanticType::DateTimeTzImmutable => "datetimetz_immutable",
            SemanticType::DateInterval => "dateinterval",
            SemanticType::Decimal => "decimal",
            SemanticType::Float => "float",
            SemanticType::Guid => "guid",
            SemanticType::Integer => "integer",
            SemanticType::Json => "json",
            SemanticType::SimpleArray => "simple_array",
            SemanticType::SmallInt => "smallint",
            SemanticType::String => "string",
            SemanticType::Text => "text",
            SemanticType::Time => "time",
            SemanticType::TimeImmutable => "time_immutable",
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SemanticType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ascii_string" => Ok(SemanticType::AsciiString),
            "bigint" => Ok(SemanticType::BigInt),
            "binary" => Ok(SemanticType::Binary),
            "blob" => Ok(SemanticType::Blob),
            "boolean" => Ok(SemanticType::Boolean),
            "date" => Ok(SemanticType::Date),
            "date_immutable" => Ok(SemanticType::DateImmutable),
            "datetime" => Ok(SemanticType::DateTime),
            "datetime_immutable" => Ok(SemanticType::DateTimeImmutable),
            "datetimetz" => Ok(SemanticType::DateTimeTz),
            "datetimetz_immutable" => Ok(SemanticType::DateTimeTzImmutable),
            "dateinterval" => Ok(SemanticType::DateInterval),
            "decimal" => Ok(SemanticType::Decimal),
            "float" => Ok(SemanticType::Float),
            "guid" => Ok(SemanticType::Guid),
            "integer" => Ok(SemanticType::Integer),
            "json" => Ok(SemanticType::Json),
            "simple_array" => Ok(SemanticType::SimpleArray),
            "smallint" => Ok(SemanticType::SmallInt),
            "string" => Ok(SemanticType::String),
            "text" => Ok(SemanticType::Text),
            "time" => Ok(SemanticType::Time),
            "time_immutable" => Ok(SemanticType::TimeImmutable),
            _ => Err(format!("Unknown semantic type: {}", s)),
        }
    }
}

/// Everything the generator needs to know about one table.
///
/// Fetched once per table per run and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct TableMetadata {
    pub name: String,
    pub columns: Vec<ColumnMetadata>,
    pub indexes: Vec<IndexMetadata>,
    pub foreign_keys: Vec<ForeignKeyMetadata>,
}

impl TableMetadata {
    pub fn column(&self, name: &str) -> Option<&ColumnMetadata> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Column metadata
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMetadata {
    pub name: String,
    pub semantic_type: SemanticType,
    pub nullable: bool,
    pub length: Option<u32>,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
    pub default: Option<String>,
    pub autoincrement: bool,
}

impl ColumnMetadata {
    /// A non-null column with no length, precision, scale or default.
    pub fn new(name: impl Into<String>, semantic_type: SemanticType) -> Self {
        Self {
            name: name.into(),
            semantic_type,
            nullable: false,
            length: None,
            precision: None,
            scale: None,
            default: None,
            autoincrement: false,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    pub fn precision(mut self, precision: u32, scale: u32) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }

    pub fn default_value(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn autoincrement(mut self) -> Self {
        self.autoincrement = true;
        self
    }
}

/// Name of the index that backs a table's primary key.
pub const PRIMARY_INDEX_NAME: &str = "primary";

/// Index metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexMetadata {
    pub name: String,
    pub columns: Vec<String>,
    pub is_unique: bool,
}

impl IndexMetadata {
    pub fn new<I, S>(name: impl Into<String>, columns: I, is_unique: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            is_unique,
        }
    }

    pub fn primary<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(PRIMARY_INDEX_NAME, columns, true)
    }

    /// The primary index is implied by the identifier property and never
    /// emitted as an explicit index.
    pub fn is_primary(&self) -> bool {
        self.name.eq_ignore_ascii_case(PRIMARY_INDEX_NAME)
    }
}

/// Foreign key constraint metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyMetadata {
    pub name: Option<String>,
    pub local_columns: Vec<String>,
    pub foreign_table: String,
    /// Positionally paired with `local_columns`. May be shorter (or empty)
    /// when the constraint references the target's primary key implicitly.
    pub foreign_columns: Vec<String>,
}

impl ForeignKeyMetadata {
    pub fn new<L, F, S>(local_columns: L, foreign_table: impl Into<String>, foreign_columns: F) -> Self
    where
        L: IntoIterator<Item = S>,
        F: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: None,
            local_columns: local_columns.into_iter().map(Into::into).collect(),
            foreign_table: foreign_table.into(),
            foreign_columns: foreign_columns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}
