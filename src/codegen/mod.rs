//! PHP source generation
//!
//! Turns [`TableMetadata`](crate::schema::TableMetadata) into the text of an
//! entity class and its repository class. Nothing here touches the
//! filesystem or the database.

mod entity_writer;
mod naming;
mod php_helpers;
mod relation;
mod repository_writer;
mod types;

pub use entity_writer::emit_entity;
pub use naming::{
    build_namespace, column_property_name, detect_naming_style, foreign_key_property_name,
    resolve_table_naming, to_camel, to_pascal, ucfirst, words_of, NamingResult, NamingStyle,
    PropertyNames, FALLBACK_CLASS_NAME, FALLBACK_NAMESPACE_SEGMENT,
};
pub use relation::{resolve_relations, Association, ResolvedRelations, DEFAULT_REFERENCED_COLUMN};
pub use repository_writer::{emit_repository, repository_file_name};
pub use types::{storage_tag, value_type, StorageTag, ValueType, TYPE_OVERRIDES};

/// Namespaces of the classes generated for one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedNamespaces {
    /// Namespace of the entity class (root plus segment).
    pub entity: String,
    /// Configured entity namespace root, used to place related entities.
    pub entity_root: String,
    /// Namespace of the repository class (root plus segment).
    pub repository: String,
}

impl GeneratedNamespaces {
    pub fn new(entity_root: &str, repository_root: &str, naming: &NamingResult) -> Self {
        Self {
            entity: build_namespace(entity_root, &naming.namespace_segment),
            entity_root: entity_root.to_string(),
            repository: build_namespace(repository_root, &naming.namespace_segment),
        }
    }
}

/// File name of the entity for `class_name`.
pub fn entity_file_name(class_name: &str) -> String {
    format!("{}.php", class_name)
}
