//! Run configuration
//!
//! - [`settings`]: the `entitygen.toml` file and its named connections
//! - [`connection`]: schema source selection and introspector construction
//! - [`options`]: command line option resolution into [`GenerationConfig`]

pub mod connection;
pub mod options;
pub mod settings;

use std::path::PathBuf;

pub use connection::{open_introspector, ConnectionSettings, Driver};
pub use options::{
    absolutize, normalize_tables, resolve_generation_config, resolve_overwrite, GenerateOptions,
    RepositoryMode, DEFAULT_CONNECTION,
};
pub use settings::{expand_env_vars, Settings, SettingsError};

/// Validated configuration of one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationConfig {
    /// Root namespace of generated entities
    pub entity_namespace: String,
    /// Absolute root directory of generated entities
    pub entity_path: PathBuf,
    /// Root namespace of generated repositories
    pub repository_namespace: String,
    /// Absolute root directory of generated repositories
    pub repository_path: PathBuf,
    pub generate_repositories: bool,
    pub overwrite_existing: bool,
    /// Render everything, write nothing
    pub dry_run: bool,
    /// Requested tables, already trimmed; empty means all tables
    pub tables: Vec<String>,
}
