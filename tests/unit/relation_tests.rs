//! Unit tests for foreign key association resolution

use rust_entitygen::codegen::{resolve_relations, PropertyNames};
use rust_entitygen::schema::{ColumnMetadata, ForeignKeyMetadata, SemanticType, TableMetadata};

fn table(name: &str, columns: Vec<ColumnMetadata>, foreign_keys: Vec<ForeignKeyMetadata>) -> TableMetadata {
    TableMetadata {
        name: name.to_string(),
        columns,
        indexes: Vec::new(),
        foreign_keys,
    }
}

#[test]
fn test_each_local_column_becomes_an_association() {
    let posts = table(
        "posts",
        vec![
            ColumnMetadata::new("id", SemanticType::Integer),
            ColumnMetadata::new("author_id", SemanticType::Integer),
            ColumnMetadata::new("editor_id", SemanticType::Integer).nullable(),
            ColumnMetadata::new("title", SemanticType::String),
        ],
        vec![
            ForeignKeyMetadata::new(["author_id"], "users", ["id"]),
            ForeignKeyMetadata::new(["editor_id"], "users", ["id"]),
        ],
    );

    let mut names = PropertyNames::new();
    let relations = resolve_relations(&posts, "App\\Entity", &mut names);

    assert_eq!(relations.associations.len(), 2);
    let author = &relations.associations[0];
    assert_eq!(author.property_name, "author");
    assert_eq!(author.target_class, "Users");
    assert_eq!(author.target_namespace, "App\\Entity\\Users");
    assert_eq!(author.target_fqcn(), "App\\Entity\\Users\\Users");
    assert_eq!(author.referenced_column, "id");
    assert!(!author.nullable);
    assert!(!author.fallback_reference);

    let editor = &relations.associations[1];
    assert_eq!(editor.property_name, "editor");
    assert!(editor.nullable);

    assert!(relations.consumes("author_id"));
    assert!(relations.consumes("editor_id"));
    assert!(!relations.consumes("title"));
    assert!(names.is_used("author"));
}

#[test]
fn test_multi_word_target_lands_in_first_word_namespace() {
    let items = table(
        "order_items",
        vec![ColumnMetadata::new("order_line_id", SemanticType::Integer)],
        vec![ForeignKeyMetadata::new(["order_line_id"], "order_lines", ["id"])],
    );

    let relations = resolve_relations(&items, "App\\Entity", &mut PropertyNames::new());
    let association = &relations.associations[0];
    assert_eq!(association.property_name, "orderLine");
    assert_eq!(association.target_fqcn(), "App\\Entity\\Order\\OrderLines");
}

#[test]
fn test_short_foreign_column_list_falls_back_to_first_column() {
    let shipments = table(
        "shipments",
        vec![
            ColumnMetadata::new("warehouse_id", SemanticType::Integer),
            ColumnMetadata::new("warehouse_region", SemanticType::String),
        ],
        vec![ForeignKeyMetadata::new(
            ["warehouse_id", "warehouse_region"],
            "warehouses",
            ["code"],
        )],
    );

    let relations = resolve_relations(&shipments, "App\\Entity", &mut PropertyNames::new());
    assert_eq!(relations.associations.len(), 2);

    assert_eq!(relations.associations[0].referenced_column, "code");
    assert!(!relations.associations[0].fallback_reference);

    assert_eq!(relations.associations[1].local_column, "warehouse_region");
    assert_eq!(relations.associations[1].referenced_column, "code");
    assert!(relations.associations[1].fallback_reference);
}

#[test]
fn test_empty_foreign_column_list_references_id() {
    let comments = table(
        "comments",
        vec![ColumnMetadata::new("post_id", SemanticType::Integer)],
        vec![ForeignKeyMetadata::new(["post_id"], "posts", Vec::<&str>::new())],
    );

    let relations = resolve_relations(&comments, "App\\Entity", &mut PropertyNames::new());
    assert_eq!(relations.associations[0].referenced_column, "id");
    assert!(relations.associations[0].fallback_reference);
}

#[test]
fn test_unknown_local_column_is_nullable() {
    let orphans = table(
        "orphans",
        Vec::new(),
        vec![ForeignKeyMetadata::new(["parent_id"], "parents", ["id"])],
    );

    let relations = resolve_relations(&orphans, "App\\Entity", &mut PropertyNames::new());
    assert!(relations.associations[0].nullable);
}

#[test]
fn test_colliding_property_names_are_suffixed() {
    let tasks = table(
        "tasks",
        vec![
            ColumnMetadata::new("owner", SemanticType::Integer),
            ColumnMetadata::new("owner_id", SemanticType::Integer),
        ],
        vec![
            ForeignKeyMetadata::new(["owner"], "people", ["id"]),
            ForeignKeyMetadata::new(["owner_id"], "teams", ["id"]),
        ],
    );

    let relations = resolve_relations(&tasks, "App\\Entity", &mut PropertyNames::new());
    let properties: Vec<&str> = relations
        .associations
        .iter()
        .map(|a| a.property_name.as_str())
        .collect();
    assert_eq!(properties, vec!["owner", "owner2"]);
}

#[test]
fn test_self_reference_is_not_imported() {
    let categories = table(
        "categories",
        vec![ColumnMetadata::new("parent_id", SemanticType::Integer).nullable()],
        vec![ForeignKeyMetadata::new(["parent_id"], "categories", ["id"])],
    );

    let relations = resolve_relations(&categories, "App\\Entity", &mut PropertyNames::new());
    assert!(relations
        .imports("App\\Entity\\Categories\\Categories")
        .is_empty());
    assert_eq!(relations.imports("App\\Entity\\Other\\Other").len(), 1);
}

#[test]
fn test_imports_are_sorted_and_unique() {
    let posts = table(
        "posts",
        Vec::new(),
        vec![
            ForeignKeyMetadata::new(["user_id"], "users", ["id"]),
            ForeignKeyMetadata::new(["blog_id"], "blogs", ["id"]),
            ForeignKeyMetadata::new(["reviewer_id"], "users", ["id"]),
        ],
    );

    let relations = resolve_relations(&posts, "App\\Entity", &mut PropertyNames::new());
    let imports: Vec<String> = relations.imports("App\\Entity\\Posts\\Posts").into_iter().collect();
    assert_eq!(
        imports,
        vec![
            "App\\Entity\\Blogs\\Blogs".to_string(),
            "App\\Entity\\Users\\Users".to_string()
        ]
    );
}
