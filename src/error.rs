//! Error types for rust-entitygen

use std::path::PathBuf;
use thiserror::Error;

use crate::schema::IntrospectionError;

/// Errors that can occur while generating entities from a schema.
///
/// Only [`EntityGenError::TableListing`] and [`EntityGenError::Configuration`]
/// stop a run. Everything else is collected into
/// [`GenerationResult::errors`](crate::generator::GenerationResult) while the
/// remaining tables are still processed.
#[derive(Error, Debug)]
pub enum EntityGenError {
    #[error("Failed to fetch table list: {source}")]
    TableListing {
        #[source]
        source: IntrospectionError,
    },

    #[error("Table '{table}' does not exist in the schema.")]
    UnknownTable { table: String },

    #[error("Failed to fetch metadata for table '{table}': {source}")]
    SchemaIntrospection {
        table: String,
        #[source]
        source: IntrospectionError,
    },

    #[error("Failed to create directory '{}': {source}", path.display())]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{}': {source}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{message}")]
    Configuration { message: String },
}

impl EntityGenError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        EntityGenError::Configuration {
            message: message.into(),
        }
    }

    /// True for the two error kinds that abort a run outright.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            EntityGenError::TableListing { .. } | EntityGenError::Configuration { .. }
        )
    }
}
