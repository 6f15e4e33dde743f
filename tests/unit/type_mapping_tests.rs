//! Unit tests for semantic type mapping

use rust_entitygen::codegen::{storage_tag, value_type, StorageTag, ValueType, TYPE_OVERRIDES};
use rust_entitygen::schema::{ColumnMetadata, SemanticType};

fn mapping(semantic: SemanticType) -> (StorageTag, ValueType) {
    let column = ColumnMetadata::new("c", semantic);
    (storage_tag(&column), value_type(&column))
}

#[test]
fn test_temporal_types_map_to_immutable_datetime() {
    for semantic in [
        SemanticType::Date,
        SemanticType::DateImmutable,
        SemanticType::DateTime,
        SemanticType::DateTimeImmutable,
        SemanticType::DateTimeTz,
        SemanticType::DateTimeTzImmutable,
        SemanticType::Time,
        SemanticType::TimeImmutable,
    ] {
        assert_eq!(
            mapping(semantic),
            (StorageTag::DateTimeImmutable, ValueType::DateTimeImmutable),
            "{} should map to DATETIME_IMMUTABLE",
            semantic
        );
    }
}

#[test]
fn test_numeric_types() {
    assert_eq!(mapping(SemanticType::BigInt), (StorageTag::BigInt, ValueType::Int));
    assert_eq!(mapping(SemanticType::SmallInt), (StorageTag::SmallInt, ValueType::Int));
    assert_eq!(mapping(SemanticType::Integer), (StorageTag::Integer, ValueType::Int));
    assert_eq!(mapping(SemanticType::Decimal), (StorageTag::Decimal, ValueType::Float));
    assert_eq!(mapping(SemanticType::Float), (StorageTag::Float, ValueType::Float));
    assert_eq!(mapping(SemanticType::Boolean), (StorageTag::Boolean, ValueType::Bool));
}

#[test]
fn test_structured_and_binary_types() {
    assert_eq!(mapping(SemanticType::Json), (StorageTag::Json, ValueType::Array));
    assert_eq!(
        mapping(SemanticType::SimpleArray),
        (StorageTag::SimpleArray, ValueType::Array)
    );
    assert_eq!(mapping(SemanticType::Blob), (StorageTag::Blob, ValueType::String));
    assert_eq!(mapping(SemanticType::Binary), (StorageTag::Binary, ValueType::String));
    assert_eq!(mapping(SemanticType::Guid), (StorageTag::Guid, ValueType::String));
    assert_eq!(
        mapping(SemanticType::DateInterval),
        (StorageTag::DateInterval, ValueType::DateInterval)
    );
}

#[test]
fn test_strings_fall_back_to_string() {
    assert_eq!(mapping(SemanticType::Text), (StorageTag::Text, ValueType::String));
    assert_eq!(mapping(SemanticType::String), (StorageTag::String, ValueType::String));
    assert_eq!(
        mapping(SemanticType::AsciiString),
        (StorageTag::String, ValueType::String)
    );
}

#[test]
fn test_constant_names_and_declarations() {
    assert_eq!(StorageTag::DateTimeImmutable.constant_name(), "DATETIME_IMMUTABLE");
    assert_eq!(StorageTag::SimpleArray.constant_name(), "SIMPLE_ARRAY");
    assert_eq!(ValueType::DateTimeImmutable.declaration(), "\\DateTimeImmutable");
    assert_eq!(ValueType::Bool.declaration(), "bool");
}

#[test]
fn test_type_overrides() {
    assert_eq!(
        TYPE_OVERRIDES,
        &[
            ("enum", SemanticType::String),
            ("point", SemanticType::Binary),
            ("polygon", SemanticType::Binary),
            ("multipolygon", SemanticType::Binary),
        ]
    );
}
