//! Semantic type to storage tag / value type mapping

use crate::schema::{ColumnMetadata, SemanticType};

/// Raw types that have no built-in mapping but show up in real schemas.
/// Registered on the introspector before any table is read.
pub const TYPE_OVERRIDES: &[(&str, SemanticType)] = &[
    ("enum", SemanticType::String),
    ("point", SemanticType::Binary),
    ("polygon", SemanticType::Binary),
    ("multipolygon", SemanticType::Binary),
];

/// Storage type constant emitted as `Types::<NAME>` in column attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageTag {
    BigInt,
    Binary,
    Blob,
    Boolean,
    DateTimeImmutable,
    DateInterval,
    Decimal,
    Float,
    Guid,
    Integer,
    Json,
    SimpleArray,
    SmallInt,
    Text,
    String,
}

impl StorageTag {
    pub fn constant_name(&self) -> &'static str {
        match self {
            StorageTag::BigInt => "BIGINT",
            StorageTag::Binary => "BINARY",
            StorageTag::Blob => "BLOB",
            StorageTag::Boolean => "BOOLEAN",
            StorageTag::DateTimeImmutable => "DATETIME_IMMUTABLE",
            StorageTag::DateInterval => "DATEINTERVAL",
            StorageTag::Decimal => "DECIMAL",
            StorageTag::Float => "FLOAT",
            StorageTag::Guid => "GUID",
            StorageTag::Integer => "INTEGER",
            StorageTag::Json => "JSON",
            StorageTag::SimpleArray => "SIMPLE_ARRAY",
            StorageTag::SmallInt => "SMALLINT",
            StorageTag::Text => "TEXT",
            StorageTag::String => "STRING",
        }
    }
}

/// Type of the generated property and of its getter/setter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Bool,
    Int,
    Float,
    Array,
    String,
    DateTimeImmutable,
    DateInterval,
}

impl ValueType {
    /// Type name as written in a declaration; classes are fully qualified.
    pub fn declaration(&self) -> &'static str {
        match self {
            ValueType::Bool => "bool",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::Array => "array",
            ValueType::String => "string",
            ValueType::DateTimeImmutable => "\\DateTimeImmutable",
            ValueType::DateInterval => "\\DateInterval",
        }
    }
}

/// Static mapping table. Semantic types missing here fall back to
/// [`DEFAULT_MAPPING`].
const TYPE_TABLE: &[(SemanticType, StorageTag, ValueType)] = &[
    (SemanticType::BigInt, StorageTag::BigInt, ValueType::Int),
    (SemanticType::Binary, StorageTag::Binary, ValueType::String),
    (SemanticType::Blob, StorageTag::Blob, ValueType::String),
    (SemanticType::Boolean, StorageTag::Boolean, ValueType::Bool),
    (SemanticType::Date, StorageTag::DateTimeImmutable, ValueType::DateTimeImmutable),
    (SemanticType::DateImmutable, StorageTag::DateTimeImmutable, ValueType::DateTimeImmutable),
    (SemanticType::DateTime, StorageTag::DateTimeImmutable, ValueType::DateTimeImmutable),
    (SemanticType::DateTimeImmutable, StorageTag::DateTimeImmutable, ValueType::DateTimeImmutable),
    (SemanticType::DateTimeTz, StorageTag::DateTimeImmutable, ValueType::DateTimeImmutable),
    (SemanticType::DateTimeTzImmutable, StorageTag::DateTimeImmutable, ValueType::DateTimeImmutable),
    (SemanticType::Time, StorageTag::DateTimeImmutable, ValueType::DateTimeImmutable),
    (SemanticType::TimeImmutable, StorageTag::DateTimeImmutable, ValueType::DateTimeImmutable),
    (SemanticType::DateInterval, StorageTag::DateInterval, ValueType::DateInterval),
    (SemanticType::Decimal, StorageTag::Decimal, ValueType::Float),
    (SemanticType::Float, StorageTag::Float, ValueType::Float),
    (SemanticType::Guid, StorageTag::Guid, ValueType::String),
    (SemanticType::Integer, StorageTag::Integer, ValueType::Int),
    (SemanticType::Json, StorageTag::Json, ValueType::Array),
    (SemanticType::SimpleArray, StorageTag::SimpleArray, ValueType::Array),
    (SemanticType::SmallInt, StorageTag::SmallInt, ValueType::Int),
    (SemanticType::Text, StorageTag::Text, ValueType::String),
];

const DEFAULT_MAPPING: (StorageTag, ValueType) = (StorageTag::String, ValueType::String);

fn lookup(semantic: SemanticType) -> (StorageTag, ValueType) {
    TYPE_TABLE
        .iter()
        .find(|(ty, _, _)| *ty == semantic)
        .map(|(_, tag, value)| (*tag, *value))
        .unwrap_or(DEFAULT_MAPPING)
}

pub fn storage_tag(column: &ColumnMetadata) -> StorageTag {
    lookup(column.semantic_type).0
}

pub fn value_type(column: &ColumnMetadata) -> ValueType {
    lookup(column.semantic_type).1
}
