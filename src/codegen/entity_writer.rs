//! Entity class emission
//!
//! Layout of a generated entity, in order:
//!
//! 1. header and namespace
//! 2. imports: repository, related entities (sorted), `Types`, `ORM`
//! 3. class attributes: `Entity`, one `UniqueConstraint`/`Index` per
//!    non-primary index, `Table`
//! 4. association properties, then scalar properties
//! 5. accessors, in the same order as the properties
//!
//! The `Types` and `ORM` imports are aliased when the entity, its
//! repository or a related entity already uses that short name.

use super::naming::{column_property_name, NamingResult, PropertyNames};
use super::php_helpers::{
    accessors, file_header, is_identifier_property, member_attribute, property_declaration, quote,
    string_list,
};
use super::relation::{resolve_relations, Association};
use super::types::{storage_tag, value_type};
use super::GeneratedNamespaces;
use crate::schema::{ColumnMetadata, IndexMetadata, TableMetadata};

/// Render the entity class for `table`.
///
/// Pure function of its inputs; identical inputs give byte-identical output.
pub fn emit_entity(
    table: &TableMetadata,
    naming: &NamingResult,
    namespaces: &GeneratedNamespaces,
    with_repository: bool,
) -> String {
    let class_name = &naming.class_name;
    let own_fqcn = format!("{}\\{}", namespaces.entity, class_name);

    let mut names = PropertyNames::new();
    let relations = resolve_relations(table, &namespaces.entity_root, &mut names);

    let imports = relations.imports(&own_fqcn);
    let repository_class = format!("{}Repository", class_name);

    let mut taken = vec![class_name.as_str()];
    if with_repository {
        taken.push(&repository_class);
    }
    taken.extend(imports.iter().map(|fqcn| short_name(fqcn)));
    let aliases = MappingAliases::avoiding(&taken);

    let mut code = file_header(&namespaces.entity);

    if with_repository {
        code.push_str(&format!(
            "use {}\\{};\n",
            namespaces.repository, repository_class
        ));
    }
    for import in &imports {
        code.push_str(&format!("use {};\n", import));
    }
    code.push_str(&aliases.use_statements());

    let orm = aliases.orm;
    if with_repository {
        code.push_str(&format!(
            "#[{}\\Entity(repositoryClass: {}::class)]\n",
            orm, repository_class
        ));
    } else {
        code.push_str(&format!("#[{}\\Entity]\n", orm));
    }

    for index in table.indexes.iter().filter(|index| !index.is_primary()) {
        code.push_str(&index_attribute(index, &aliases));
    }

    code.push_str(&format!("#[{}\\Table(name: {})]\n", orm, quote(&table.name)));
    code.push_str(&format!("class {}\n{{\n", class_name));

    let mut methods = String::new();

    for association in &relations.associations {
        code.push_str(&association_property(association, &aliases));
        methods.push_str(&accessors(
            &association.property_name,
            &association.target_class,
            association.nullable,
        ));
    }

    for column in table.columns.iter().filter(|c| !relations.consumes(&c.name)) {
        let property_name = names.claim(&column_property_name(&column.name));
        let type_name = value_type(column).declaration();

        code.push_str(&scalar_property(column, &property_name, &aliases));
        methods.push_str(&accessors(&property_name, type_name, column.nullable));
    }

    code.push_str(&methods);
    code.push_str("}\n");
    code
}

/// Local names of the Doctrine `Types` class and the `ORM` mapping namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MappingAliases {
    types: &'static str,
    orm: &'static str,
}

impl MappingAliases {
    /// PHP class names are case-insensitive, so `taken` is compared that way.
    fn avoiding(taken: &[&str]) -> Self {
        let is_taken = |name: &str| taken.iter().any(|t| t.eq_ignore_ascii_case(name));
        Self {
            types: if is_taken("Types") { "DbalTypes" } else { "Types" },
            orm: if is_taken("ORM") { "DoctrineORM" } else { "ORM" },
        }
    }

    fn use_statements(&self) -> String {
        let mut code = String::from("use Doctrine\\DBAL\\Types\\Types");
        if self.types != "Types" {
            code.push_str(&format!(" as {}", self.types));
        }
        code.push_str(&format!(";\nuse Doctrine\\ORM\\Mapping as {};\n\n", self.orm));
        code
    }
}

fn short_name(fqcn: &str) -> &str {
    fqcn.rsplit('\\').next().unwrap_or(fqcn)
}

fn index_attribute(index: &IndexMetadata, aliases: &MappingAliases) -> String {
    let kind = if index.is_unique {
        "UniqueConstraint"
    } else {
        "Index"
    };
    format!(
        "#[{}\\{}(name: {}, columns: {})]\n",
        aliases.orm,
        kind,
        quote(&index.name),
        string_list(&index.columns)
    )
}

fn association_property(association: &Association, aliases: &MappingAliases) -> String {
    let mut code = member_attribute(&format!(
        "{}\\ManyToOne(targetEntity: {}::class)",
        aliases.orm, association.target_class
    ));

    let mut join_column = format!(
        "{}\\JoinColumn(name: {}, referencedColumnName: {}",
        aliases.orm,
        quote(&association.local_column),
        quote(&association.referenced_column)
    );
    if !association.nullable {
        join_column.push_str(", nullable: false");
    }
    join_column.push(')');
    code.push_str(&member_attribute(&join_column));

    code.push_str(&property_declaration(
        &association.property_name,
        &association.target_class,
        association.nullable,
    ));
    code
}

fn scalar_property(
    column: &ColumnMetadata,
    property_name: &str,
    aliases: &MappingAliases,
) -> String {
    let mut code = String::new();

    if is_identifier_property(property_name) {
        code.push_str(&member_attribute(&format!("{}\\Id", aliases.orm)));
    }
    if column.autoincrement {
        code.push_str(&member_attribute(&format!("{}\\GeneratedValue", aliases.orm)));
    }

    let mut attribute = format!(
        "{}\\Column(name: {}, type: {}::{}",
        aliases.orm,
        quote(&column.name),
        aliases.types,
        storage_tag(column).constant_name()
    );
    if let Some(precision) = column.precision.filter(|p| *p > 0) {
        attribute.push_str(&format!(", precision: {}", precision));
    }
    if let Some(scale) = column.scale.filter(|s| *s > 0) {
        attribute.push_str(&format!(", scale: {}", scale));
    }
    if let Some(length) = column.length.filter(|l| *l > 0) {
        attribute.push_str(&format!(", length: {}", length));
    }
    if column.nullable {
        attribute.push_str(", nullable: true");
    }
    if let Some(default) = &column.default {
        attribute.push_str(&format!(", options: ['default' => {}]", quote(default)));
    }
    attribute.push(')');
    code.push_str(&member_attribute(&attribute));

    code.push_str(&property_declaration(
        property_name,
        value_type(column).declaration(),
        column.nullable,
    ));
    code
}
