//! TOML settings file (`entitygen.toml`)
//!
//! Every key is optional:
//!
//! ```toml
//! entity_path = "src/Entity"
//! entity_namespace = "App\\Entity"
//! repository_path = "src/Repository"
//! repository_namespace = "App\\Repository"
//! generate_repositories = true
//! overwrite_existing = false
//!
//! [connections.default]
//! driver = "sqlite"
//! url = "var/data.db"
//! ```

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::connection::ConnectionSettings;

/// Default settings file name, looked up in the project directory.
pub const SETTINGS_FILE_NAME: &str = "entitygen.toml";

/// Environment variable overriding the settings file location.
pub const SETTINGS_ENV_VAR: &str = "ENTITYGEN_CONFIG";

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Connection not found: {0}")]
    ConnectionNotFound(String),

    #[error("Unsupported driver: {0}. Supported: sqlite, ddl")]
    UnsupportedDriver(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure. Supplies the defaults that command line
/// options override.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub entity_path: String,
    pub entity_namespace: String,
    pub repository_path: String,
    pub repository_namespace: String,
    pub generate_repositories: bool,
    pub overwrite_existing: bool,

    /// Named schema sources.
    pub connections: BTreeMap<String, ConnectionSettings>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            entity_path: "src/Entity".to_string(),
            entity_namespace: "App\\Entity".to_string(),
            repository_path: "src/Repository".to_string(),
            repository_namespace: "App\\Repository".to_string(),
            generate_repositories: true,
            overwrite_existing: false,
            connections: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    /// Load settings for a project.
    ///
    /// Searches in order:
    /// 1. the explicit `path`, which must exist
    /// 2. environment variable `ENTITYGEN_CONFIG`
    /// 3. `<project_dir>/entitygen.toml`
    ///
    /// Falls back to defaults when no file is found.
    pub fn load(project_dir: &Path, path: Option<&Path>) -> Result<Self, SettingsError> {
        if let Some(path) = path {
            return Self::from_file(project_dir.join(path));
        }

        if let Ok(path) = env::var(SETTINGS_ENV_VAR) {
            return Self::from_file(project_dir.join(path));
        }

        let local = project_dir.join(SETTINGS_FILE_NAME);
        if local.exists() {
            return Self::from_file(&local);
        }

        Ok(Settings::default())
    }

    /// Resolve a connection selector: a named connection, or an inline
    /// `driver:path` spec.
    pub fn resolve_connection(&self, selector: &str) -> Result<ConnectionSettings, SettingsError> {
        if let Some(connection) = self.connections.get(selector) {
            return Ok(connection.clone());
        }

        ConnectionSettings::parse_inline(selector)
            .ok_or_else(|| SettingsError::ConnectionNotFound(selector.to_string()))
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax. A lone `$` is kept.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let var_name: String = if chars.peek() == Some(&'{') {
            chars.next();
            chars.by_ref().take_while(|&ch| ch != '}').collect()
        } else {
            let mut name = String::new();
            while let Some(&ch) = chars.peek() {
                if !(ch.is_alphanumeric() || ch == '_') {
                    break;
                }
                name.push(ch);
                chars.next();
            }
            if name.is_empty() {
                result.push('$');
                continue;
            }
            name
        };

        let value = env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name))?;
        result.push_str(&value);
    }

    Ok(result)
}
