//! rust-entitygen: Doctrine entity and repository generator
//!
//! This library reads the schema of an existing database (a live SQLite
//! file or a DDL schema dump) and generates one PHP entity class per table,
//! plus a repository class, annotated with Doctrine ORM mapping attributes.

pub mod codegen;
pub mod config;
pub mod error;
pub mod generator;
pub mod report;
pub mod schema;

use anyhow::{Context, Result};
use tracing::debug;

pub use config::{GenerateOptions, GenerationConfig, Settings};
pub use error::EntityGenError;
pub use generator::{EntityGenerator, GenerationResult};

use schema::SchemaIntrospector;

/// A validated run, connected to its schema source and ready to execute.
pub struct PreparedRun {
    /// Connection selector the run was prepared with
    pub connection: String,
    pub config: GenerationConfig,
    introspector: Box<dyn SchemaIntrospector>,
}

impl PreparedRun {
    /// Generate all selected tables, calling `progress` before each one.
    pub fn execute<P: FnMut(&str)>(mut self, progress: P) -> GenerationResult {
        EntityGenerator::new().generate_with_progress(
            self.introspector.as_mut(),
            &self.config,
            progress,
        )
    }
}

/// Load settings, validate options and open the schema source.
///
/// Configuration problems are reported here, before any table is read.
pub fn prepare_run(options: &GenerateOptions) -> Result<PreparedRun> {
    let settings = Settings::load(&options.project_dir, options.config_path.as_deref())
        .context("Failed to load settings")?;

    let config = config::resolve_generation_config(options, &settings)?;
    debug!(?config, "Resolved generation config");

    let connection = settings.resolve_connection(&options.connection)?;
    let introspector = config::open_introspector(&connection, &options.project_dir)
        .with_context(|| {
            format!(
                "Failed to retrieve connection \"{}\"",
                options.connection
            )
        })?;

    Ok(PreparedRun {
        connection: options.connection.clone(),
        config,
        introspector,
    })
}

/// Prepare and execute a run in one step.
pub fn run_generation(options: &GenerateOptions) -> Result<GenerationResult> {
    Ok(prepare_run(options)?.execute(|_| {}))
}
