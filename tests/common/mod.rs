//! Common test utilities for rust-entitygen tests

#![allow(dead_code)]

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;
use walkdir::WalkDir;

use rust_entitygen::config::GenerationConfig;
use rust_entitygen::schema::{
    ColumnMetadata, ForeignKeyMetadata, IndexMetadata, IntrospectionError, SchemaIntrospector,
    SemanticType, TableMetadata,
};
use rust_entitygen::GenerateOptions;

/// Test context with temporary directory for isolated test execution
pub struct TestContext {
    /// Kept to prevent temp directory cleanup until TestContext is dropped
    _temp_dir: TempDir,
    pub project_dir: PathBuf,
}

impl TestContext {
    /// Empty project directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let project_dir = temp_dir.path().to_path_buf();
        Self {
            _temp_dir: temp_dir,
            project_dir,
        }
    }

    /// Create a new test context by copying a fixture to a temp directory
    pub fn with_fixture(fixture_name: &str) -> Self {
        let ctx = Self::new();
        let fixture_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join(fixture_name);

        for entry in WalkDir::new(&fixture_path).min_depth(1) {
            let entry = entry.expect("Failed to walk fixture");
            let relative = entry.path().strip_prefix(&fixture_path).unwrap();
            let target = ctx.project_dir.join(relative);
            if entry.file_type().is_dir() {
                fs::create_dir_all(&target).unwrap();
            } else {
                fs::copy(entry.path(), &target).expect("Failed to copy fixture file");
            }
        }
        ctx
    }

    /// Options pointing at this project, everything else default
    pub fn options(&self) -> GenerateOptions {
        GenerateOptions {
            project_dir: self.project_dir.clone(),
            ..GenerateOptions::default()
        }
    }

    /// Generation config writing below this project's `src/`
    pub fn config(&self) -> GenerationConfig {
        GenerationConfig {
            entity_namespace: "App\\Entity".to_string(),
            entity_path: self.project_dir.join("src").join("Entity"),
            repository_namespace: "App\\Repository".to_string(),
            repository_path: self.project_dir.join("src").join("Repository"),
            generate_repositories: true,
            overwrite_existing: false,
            dry_run: false,
            tables: Vec::new(),
        }
    }

    /// Every generated `.php` file, relative to the project, `/`-separated, sorted
    pub fn generated_files(&self) -> Vec<String> {
        let mut files: Vec<String> = WalkDir::new(&self.project_dir)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "php"))
            .map(|e| {
                e.path()
                    .strip_prefix(&self.project_dir)
                    .unwrap()
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect::<Vec<_>>()
                    .join("/")
            })
            .collect();
        files.sort();
        files
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.project_dir.join(relative))
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", relative, e))
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.project_dir.join(relative)
    }
}

/// In-memory schema source with switchable failures
#[derive(Debug, Default)]
pub struct MemoryIntrospector {
    pub tables: Vec<TableMetadata>,
    pub fail_listing: bool,
    pub failing_tables: HashSet<String>,
    pub registered_types: Vec<String>,
}

impl MemoryIntrospector {
    pub fn new(tables: Vec<TableMetadata>) -> Self {
        Self {
            tables,
            ..Self::default()
        }
    }

    pub fn failing_on(mut self, table: &str) -> Self {
        self.failing_tables.insert(table.to_string());
        self
    }

    fn table(&self, name: &str) -> Result<&TableMetadata, IntrospectionError> {
        if self.failing_tables.contains(name) {
            return Err(IntrospectionError::DdlParse {
                message: format!("metadata of {} is unavailable", name),
            });
        }
        self.tables
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| IntrospectionError::TableNotFound(name.to_string()))
    }
}

impl SchemaIntrospector for MemoryIntrospector {
    fn list_table_names(&self) -> Result<Vec<String>, IntrospectionError> {
        if self.fail_listing {
            return Err(IntrospectionError::TableNotFound("information_schema".to_string()));
        }
        Ok(self.tables.iter().map(|t| t.name.clone()).collect())
    }

    fn list_table_columns(&self, table: &str) -> Result<Vec<ColumnMetadata>, IntrospectionError> {
        Ok(self.table(table)?.columns.clone())
    }

    fn list_table_indexes(&self, table: &str) -> Result<Vec<IndexMetadata>, IntrospectionError> {
        Ok(self.table(table)?.indexes.clone())
    }

    fn list_table_foreign_keys(
        &self,
        table: &str,
    ) -> Result<Vec<ForeignKeyMetadata>, IntrospectionError> {
        Ok(self.table(table)?.foreign_keys.clone())
    }

    fn register_type_override(
        &mut self,
        raw_type: &str,
        _semantic: SemanticType,
    ) -> Result<(), IntrospectionError> {
        if self.registered_types.iter().any(|t| t == raw_type) {
            return Err(IntrospectionError::TypeAlreadyRegistered {
                raw_type: raw_type.to_string(),
            });
        }
        self.registered_types.push(raw_type.to_string());
        Ok(())
    }
}

/// Table with an auto-increment `id` primary key and the given extra columns
pub fn table_with_id(name: &str, columns: Vec<ColumnMetadata>) -> TableMetadata {
    let mut all = vec![ColumnMetadata::new("id", SemanticType::Integer).autoincrement()];
    all.extend(columns);
    TableMetadata {
        name: name.to_string(),
        columns: all,
        indexes: vec![IndexMetadata::primary(["id"])],
        foreign_keys: Vec::new(),
    }
}

/// `users` and `posts(author_id -> users.id)`
pub fn users_and_posts() -> Vec<TableMetadata> {
    let users = table_with_id(
        "users",
        vec![ColumnMetadata::new("email", SemanticType::String).length(180)],
    );
    let mut posts = table_with_id(
        "posts",
        vec![
            ColumnMetadata::new("author_id", SemanticType::Integer),
            ColumnMetadata::new("title", SemanticType::String).length(255),
        ],
    );
    posts
        .foreign_keys
        .push(ForeignKeyMetadata::new(["author_id"], "users", ["id"]));
    vec![users, posts]
}
