//! Foreign key to many-to-one association resolution

use std::collections::{BTreeSet, HashSet};

use tracing::warn;

use super::naming::{build_namespace, foreign_key_property_name, resolve_table_naming, PropertyNames};
use crate::schema::TableMetadata;

/// Referenced column used when a constraint lists no foreign columns.
pub const DEFAULT_REFERENCED_COLUMN: &str = "id";

/// A many-to-one association derived from one local column of a foreign key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Association {
    pub property_name: String,
    pub target_class: String,
    pub target_namespace: String,
    pub nullable: bool,
    pub local_column: String,
    pub referenced_column: String,
    /// The foreign key listed fewer foreign columns than local columns, so
    /// `referenced_column` was not paired positionally.
    pub fallback_reference: bool,
}

impl Association {
    pub fn target_fqcn(&self) -> String {
        format!("{}\\{}", self.target_namespace, self.target_class)
    }
}

/// Associations of one table plus the columns they consume.
#[derive(Debug, Clone, Default)]
pub struct ResolvedRelations {
    pub associations: Vec<Association>,
    consumed_columns: HashSet<String>,
}

impl ResolvedRelations {
    /// Whether `column` is represented by an association and must not get
    /// a scalar property.
    pub fn consumes(&self, column: &str) -> bool {
        self.consumed_columns.contains(column)
    }

    /// Target classes to import, sorted and de-duplicated. `own_fqcn` is
    /// left out so self-references do not import the class being declared.
    pub fn imports(&self, own_fqcn: &str) -> BTreeSet<String> {
        self.associations
            .iter()
            .map(Association::target_fqcn)
            .filter(|fqcn| fqcn != own_fqcn)
            .collect()
    }
}

/// Derive one association per local column of every foreign key, in
/// foreign key order. Property names are claimed from `names`, which the
/// caller keeps using for scalar properties.
pub fn resolve_relations(
    table: &TableMetadata,
    entity_namespace_root: &str,
    names: &mut PropertyNames,
) -> ResolvedRelations {
    let mut resolved = ResolvedRelations::default();

    for foreign_key in &table.foreign_keys {
        let target = resolve_table_naming(&foreign_key.foreign_table);
        let target_namespace = build_namespace(entity_namespace_root, &target.namespace_segment);

        for (position, local_column) in foreign_key.local_columns.iter().enumerate() {
            let paired = foreign_key.foreign_columns.get(position);
            let referenced_column = paired
                .or_else(|| foreign_key.foreign_columns.first())
                .map(String::as_str)
                .unwrap_or(DEFAULT_REFERENCED_COLUMN)
                .to_string();

            if paired.is_none() {
                warn!(
                    table = %table.name,
                    column = %local_column,
                    foreign_table = %foreign_key.foreign_table,
                    referenced_column = %referenced_column,
                    "Foreign key has no positional referenced column, using fallback"
                );
            }

            // Unknown local columns are treated as nullable.
            let nullable = table
                .column(local_column)
                .map(|column| column.nullable)
                .unwrap_or(true);

            resolved.consumed_columns.insert(local_column.clone());
            resolved.associations.push(Association {
                property_name: names.claim(&foreign_key_property_name(local_column)),
                target_class: target.class_name.clone(),
                target_namespace: target_namespace.clone(),
                nullable,
                local_column: local_column.clone(),
                referenced_column,
                fallback_reference: paired.is_none(),
            });
        }
    }

    resolved
}
