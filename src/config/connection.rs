//! Schema source connections
//!
//! A connection is either declared in the settings file:
//!
//! ```toml
//! [connections.default]
//! driver = "sqlite"
//! url = "${APP_DATA}/app.db"
//!
//! [connections.snapshot]
//! driver = "ddl"
//! url = "db/schema.sql"
//! dialect = "mysql"
//! ```
//!
//! or given inline on the command line as `driver:path`
//! (`sqlite:var/app.db`, `ddl:schema.sql`).

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::options::absolutize;
use super::settings::{expand_env_vars, SettingsError};
use crate::schema::{DdlDialect, DdlIntrospector, SchemaIntrospector, SqliteIntrospector};

/// Supported schema sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    /// Live SQLite database file
    Sqlite,
    /// Schema dump of `CREATE TABLE` statements
    Ddl,
}

impl Driver {
    pub fn as_str(&self) -> &'static str {
        match self {
            Driver::Sqlite => "sqlite",
            Driver::Ddl => "ddl",
        }
    }
}

impl FromStr for Driver {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(Driver::Sqlite),
            "ddl" | "sql" => Ok(Driver::Ddl),
            other => Err(SettingsError::UnsupportedDriver(other.to_string())),
        }
    }
}

/// Connection configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ConnectionSettings {
    /// Schema source driver (sqlite, ddl).
    pub driver: String,

    /// Database file or schema dump path (supports ${ENV_VAR} expansion).
    pub url: String,

    /// SQL dialect of a schema dump.
    #[serde(default)]
    pub dialect: Option<String>,
}

impl ConnectionSettings {
    /// Parse an inline `driver:path` selector. Returns `None` when the
    /// selector has no recognised driver prefix.
    pub fn parse_inline(selector: &str) -> Option<Self> {
        let (driver, url) = selector.split_once(':')?;
        if url.is_empty() || driver.parse::<Driver>().is_err() {
            return None;
        }
        Some(Self {
            driver: driver.to_string(),
            url: url.to_string(),
            dialect: None,
        })
    }

    pub fn driver_type(&self) -> Result<Driver, SettingsError> {
        self.driver.parse()
    }

    /// The url with environment variables expanded.
    pub fn resolved_url(&self) -> Result<String, SettingsError> {
        expand_env_vars(&self.url)
    }

    pub fn dialect_type(&self) -> Result<DdlDialect, SettingsError> {
        match &self.dialect {
            Some(dialect) => dialect.parse().map_err(SettingsError::InvalidConfig),
            None => Ok(DdlDialect::default()),
        }
    }
}

/// Open the introspector described by `connection`. Relative urls are
/// resolved against `project_dir`.
pub fn open_introspector(
    connection: &ConnectionSettings,
    project_dir: &Path,
) -> anyhow::Result<Box<dyn SchemaIntrospector>> {
    let url = connection.resolved_url()?;
    let path = absolutize(project_dir, &url)?;

    let introspector: Box<dyn SchemaIntrospector> = match connection.driver_type()? {
        Driver::Sqlite => Box::new(SqliteIntrospector::open(&path)?),
        Driver::Ddl => Box::new(DdlIntrospector::from_path(&path, connection.dialect_type()?)?),
    };
    Ok(introspector)
}
