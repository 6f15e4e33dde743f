//! Command line option resolution
//!
//! Turns raw [`GenerateOptions`] plus [`Settings`] into a validated
//! [`GenerationConfig`]. Every rejection here is a
//! [`EntityGenError::Configuration`] raised before any table is processed.

use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use super::settings::Settings;
use super::GenerationConfig;
use crate::error::EntityGenError;

/// Default connection selector.
pub const DEFAULT_CONNECTION: &str = "default";

/// Raw generation options, as collected by the command line.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Project directory that relative paths are resolved against
    pub project_dir: PathBuf,
    /// Settings file; defaults to `entitygen.toml` in the project directory
    pub config_path: Option<PathBuf>,
    /// Connection name or inline `driver:path`
    pub connection: String,
    pub entity_path: Option<String>,
    pub entity_namespace: Option<String>,
    pub repository_path: Option<String>,
    pub repository_namespace: Option<String>,
    /// `auto`, `yes` or `no`
    pub repositories: String,
    pub overwrite: bool,
    pub no_overwrite: bool,
    /// Requested tables; empty means all tables
    pub tables: Vec<String>,
    pub dry_run: bool,
    pub verbose: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            project_dir: PathBuf::from("."),
            config_path: None,
            connection: DEFAULT_CONNECTION.to_string(),
            entity_path: None,
            entity_namespace: None,
            repository_path: None,
            repository_namespace: None,
            repositories: "auto".to_string(),
            overwrite: false,
            no_overwrite: false,
            tables: Vec::new(),
            dry_run: false,
            verbose: false,
        }
    }
}

/// `--repositories` tri-state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryMode {
    /// Use the settings default
    Auto,
    Yes,
    No,
}

impl RepositoryMode {
    pub fn resolve(&self, default: bool) -> bool {
        match self {
            RepositoryMode::Auto => default,
            RepositoryMode::Yes => true,
            RepositoryMode::No => false,
        }
    }
}

impl FromStr for RepositoryMode {
    type Err = EntityGenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(RepositoryMode::Auto),
            "yes" | "true" | "1" => Ok(RepositoryMode::Yes),
            "no" | "false" | "0" => Ok(RepositoryMode::No),
            _ => Err(EntityGenError::configuration(
                "Allowed values for --repositories are: auto, yes, no.",
            )),
        }
    }
}

/// Combine `--overwrite` / `--no-overwrite` with the settings default.
pub fn resolve_overwrite(
    overwrite: bool,
    no_overwrite: bool,
    default: bool,
) -> Result<bool, EntityGenError> {
    match (overwrite, no_overwrite) {
        (true, true) => Err(EntityGenError::configuration(
            "Do not combine --overwrite with --no-overwrite in one execution.",
        )),
        (true, false) => Ok(true),
        (false, true) => Ok(false),
        (false, false) => Ok(default),
    }
}

/// Trim requested table names and drop empty ones.
pub fn normalize_tables<S: AsRef<str>>(tables: &[S]) -> Vec<String> {
    tables
        .iter()
        .map(|t| t.as_ref().trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Resolve `path` against `base` unless it is already absolute, then
/// normalise it lexically. A relative `base` is taken from the current
/// directory, so the result is always absolute.
pub fn absolutize(base: &Path, path: &str) -> Result<PathBuf, EntityGenError> {
    if path.is_empty() {
        return Err(EntityGenError::configuration("Path cannot be empty."));
    }

    let path = Path::new(path);
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    let absolute = std::path::absolute(&joined).map_err(|e| {
        EntityGenError::configuration(format!(
            "Cannot resolve path '{}': {}",
            joined.display(),
            e
        ))
    })?;
    Ok(normalize_path(&absolute))
}

/// Drop `.` components and fold `..` into the preceding component.
fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(
                    normalized.components().next_back(),
                    Some(Component::Normal(_))
                );
                if can_pop {
                    normalized.pop();
                } else if !normalized.has_root() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }

    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}

/// Build the run configuration from command line options and settings.
pub fn resolve_generation_config(
    options: &GenerateOptions,
    settings: &Settings,
) -> Result<GenerationConfig, EntityGenError> {
    let entity_path = options
        .entity_path
        .as_deref()
        .unwrap_or(&settings.entity_path);
    let repository_path = options
        .repository_path
        .as_deref()
        .unwrap_or(&settings.repository_path);

    let generate_repositories = options
        .repositories
        .parse::<RepositoryMode>()?
        .resolve(settings.generate_repositories);
    let overwrite_existing = resolve_overwrite(
        options.overwrite,
        options.no_overwrite,
        settings.overwrite_existing,
    )?;

    Ok(GenerationConfig {
        entity_namespace: options
            .entity_namespace
            .clone()
            .unwrap_or_else(|| settings.entity_namespace.clone()),
        entity_path: absolutize(&options.project_dir, entity_path)?,
        repository_namespace: options
            .repository_namespace
            .clone()
            .unwrap_or_else(|| settings.repository_namespace.clone()),
        repository_path: absolutize(&options.project_dir, repository_path)?,
        generate_repositories,
        overwrite_existing,
        dry_run: options.dry_run,
        tables: normalize_tables(&options.tables),
    })
}
