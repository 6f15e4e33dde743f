//! Generation orchestrator
//!
//! Drives one run: registers type overrides, lists and selects tables,
//! fetches each table's metadata, renders the entity (and repository) and
//! hands the sources to the persistence policy.

mod result;
mod writer;

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

pub use result::GenerationResult;
pub use writer::{persist, Filesystem, OsFilesystem, WritePolicy};

use crate::codegen::{
    emit_entity, emit_repository, entity_file_name, repository_file_name, resolve_table_naming,
    GeneratedNamespaces, NamingResult, TYPE_OVERRIDES,
};
use crate::config::GenerationConfig;
use crate::error::EntityGenError;
use crate::schema::{SchemaIntrospector, TableMetadata};

/// One generated source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub directory: PathBuf,
    pub file: PathBuf,
    pub contents: String,
}

/// Everything rendered for one table.
#[derive(Debug, Clone)]
pub struct TableArtifacts {
    pub naming: NamingResult,
    pub entity: Artifact,
    pub repository: Option<Artifact>,
}

/// Generates entity and repository sources from a schema.
#[derive(Debug, Default)]
pub struct EntityGenerator<F: Filesystem = OsFilesystem> {
    filesystem: F,
}

impl EntityGenerator<OsFilesystem> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<F: Filesystem> EntityGenerator<F> {
    pub fn with_filesystem(filesystem: F) -> Self {
        Self { filesystem }
    }

    pub fn filesystem(&self) -> &F {
        &self.filesystem
    }

    pub fn generate<I>(&self, introspector: &mut I, config: &GenerationConfig) -> GenerationResult
    where
        I: SchemaIntrospector + ?Sized,
    {
        self.generate_with_progress(introspector, config, |_| {})
    }

    /// Run generation, calling `progress` with each table name before that
    /// table is processed.
    ///
    /// Only a failure to list tables ends the run early; every other
    /// problem is recorded in the result and the next table is processed.
    pub fn generate_with_progress<I, P>(
        &self,
        introspector: &mut I,
        config: &GenerationConfig,
        mut progress: P,
    ) -> GenerationResult
    where
        I: SchemaIntrospector + ?Sized,
        P: FnMut(&str),
    {
        for (raw_type, semantic) in TYPE_OVERRIDES {
            // Already registered means already usable.
            if let Err(e) = introspector.register_type_override(raw_type, *semantic) {
                debug!(raw_type = %raw_type, error = %e, "Type override not registered");
            }
        }

        let available = match introspector.list_table_names() {
            Ok(tables) => tables,
            Err(source) => {
                return GenerationResult::failed(EntityGenError::TableListing { source });
            }
        };

        let mut result = GenerationResult::default();
        let tables = resolve_tables_to_process(&config.tables, available, &mut result.errors);
        info!(count = tables.len(), dry_run = config.dry_run, "Generating entities");

        let policy = WritePolicy {
            overwrite: config.overwrite_existing,
            dry_run: config.dry_run,
        };

        for table_name in tables {
            progress(table_name.as_str());

            let table = match introspector.table_metadata(&table_name) {
                Ok(table) => table,
                Err(source) => {
                    warn!(table = %table_name, error = %source, "Failed to fetch table metadata");
                    result.errors.push(EntityGenError::SchemaIntrospection {
                        table: table_name,
                        source,
                    });
                    continue;
                }
            };

            let artifacts = render_table(&table, config);
            debug!(
                table = %table_name,
                class = %artifacts.naming.class_name,
                naming_style = %artifacts.naming.naming_style,
                "Rendered table"
            );

            let entity = &artifacts.entity;
            if persist(
                &self.filesystem,
                policy,
                &entity.directory,
                &entity.file,
                &entity.contents,
                &mut result,
            ) {
                result
                    .entities
                    .insert(table_name.clone(), entity.file.clone());
            }

            if let Some(repository) = &artifacts.repository {
                if persist(
                    &self.filesystem,
                    policy,
                    &repository.directory,
                    &repository.file,
                    &repository.contents,
                    &mut result,
                ) {
                    result
                        .repositories
                        .insert(table_name.clone(), repository.file.clone());
                }
            }
        }

        info!(
            entities = result.entities.len(),
            repositories = result.repositories.len(),
            skipped = result.skipped.len(),
            errors = result.errors.len(),
            "Generation finished"
        );
        result
    }
}

/// Render the entity and, when enabled, the repository for one table.
/// Does no I/O.
pub fn render_table(table: &TableMetadata, config: &GenerationConfig) -> TableArtifacts {
    let naming = resolve_table_naming(&table.name);
    let namespaces = GeneratedNamespaces::new(
        &config.entity_namespace,
        &config.repository_namespace,
        &naming,
    );

    let entity_dir = build_path(&config.entity_path, &naming.namespace_segment);
    let entity = Artifact {
        file: entity_dir.join(entity_file_name(&naming.class_name)),
        directory: entity_dir,
        contents: emit_entity(table, &naming, &namespaces, config.generate_repositories),
    };

    let repository = config.generate_repositories.then(|| {
        let repository_dir = build_path(&config.repository_path, &naming.namespace_segment);
        Artifact {
            file: repository_dir.join(repository_file_name(&naming.class_name)),
            directory: repository_dir,
            contents: emit_repository(&naming, &namespaces),
        }
    });

    TableArtifacts {
        naming,
        entity,
        repository,
    }
}

/// Select the tables to process.
///
/// Without a request every available table is processed. Requested names
/// match available names case-insensitively and are reported back in their
/// schema spelling; names with no match are recorded as errors. The result
/// is sorted and free of duplicates.
pub fn resolve_tables_to_process(
    requested: &[String],
    mut available: Vec<String>,
    errors: &mut Vec<EntityGenError>,
) -> Vec<String> {
    if requested.is_empty() {
        available.sort();
        return available;
    }

    let by_lowercase: HashMap<String, String> = available
        .into_iter()
        .map(|table| (table.to_lowercase(), table))
        .collect();

    let mut resolved = BTreeSet::new();
    for table in requested {
        match by_lowercase.get(&table.to_lowercase()) {
            Some(actual) => {
                resolved.insert(actual.clone());
            }
            None => {
                warn!(table = %table, "Requested table does not exist");
                errors.push(EntityGenError::UnknownTable {
                    table: table.clone(),
                });
            }
        }
    }

    resolved.into_iter().collect()
}

fn build_path(base: &Path, segment: &str) -> PathBuf {
    if segment.is_empty() {
        base.to_path_buf()
    } else {
        base.join(segment)
    }
}
