//! Schema introspection
//!
//! The generator talks to the database only through [`SchemaIntrospector`].
//! Two implementations ship with the crate:
//!
//! - [`DdlIntrospector`] reads a schema dump (`CREATE TABLE` statements)
//! - [`SqliteIntrospector`] reads a live SQLite database file

mod ddl;
mod metadata;
mod registry;
mod sqlite;

use std::path::PathBuf;

use thiserror::Error;

pub use ddl::{DdlDialect, DdlIntrospector};
pub use metadata::*;
pub use registry::{normalize_raw_type, parse_type_arguments, TypeArguments, TypeRegistry};
pub use sqlite::SqliteIntrospector;

/// Driver-level errors raised by an introspector.
#[derive(Error, Debug)]
pub enum IntrospectionError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Failed to parse schema dump: {message}")]
    DdlParse { message: String },

    #[error("Failed to read schema dump {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown database type '{raw_type}' requested for column '{column}'")]
    UnknownType { raw_type: String, column: String },

    #[error("Table '{0}' not found")]
    TableNotFound(String),

    #[error("Database type '{raw_type}' is already registered")]
    TypeAlreadyRegistered { raw_type: String },
}

/// Read-only access to a database schema.
///
/// Every call may fail with a driver-level error. The generator treats a
/// failing [`list_table_names`](SchemaIntrospector::list_table_names) as fatal
/// and every other failure as recoverable for the table at hand.
pub trait SchemaIntrospector {
    /// Names of all tables, in the order the driver reports them.
    fn list_table_names(&self) -> Result<Vec<String>, IntrospectionError>;

    /// Columns of `table` in declaration order.
    fn list_table_columns(&self, table: &str) -> Result<Vec<ColumnMetadata>, IntrospectionError>;

    /// Indexes of `table`, including the primary key index (named `primary`).
    fn list_table_indexes(&self, table: &str) -> Result<Vec<IndexMetadata>, IntrospectionError>;

    /// Foreign keys declared on `table`.
    fn list_table_foreign_keys(
        &self,
        table: &str,
    ) -> Result<Vec<ForeignKeyMetadata>, IntrospectionError>;

    /// Map a raw database type to a semantic type for later column lookups.
    ///
    /// `TypeAlreadyRegistered` means the raw type is already usable, so
    /// callers may treat it the same as success.
    fn register_type_override(
        &mut self,
        raw_type: &str,
        semantic: SemanticType,
    ) -> Result<(), IntrospectionError>;

    /// Fetch columns, indexes and foreign keys of one table.
    fn table_metadata(&self, table: &str) -> Result<TableMetadata, IntrospectionError> {
        Ok(TableMetadata {
            name: table.to_string(),
            columns: self.list_table_columns(table)?,
            indexes: self.list_table_indexes(table)?,
            foreign_keys: self.list_table_foreign_keys(table)?,
        })
    }
}

impl<T: SchemaIntrospector + ?Sized> SchemaIntrospector for Box<T> {
    fn list_table_names(&self) -> Result<Vec<String>, IntrospectionError> {
        (**self).list_table_names()
    }

    fn list_table_columns(&self, table: &str) -> Result<Vec<ColumnMetadata>, IntrospectionError> {
        (**self).list_table_columns(table)
    }

    fn list_table_indexes(&self, table: &str) -> Result<Vec<IndexMetadata>, IntrospectionError> {
        (**self).list_table_indexes(table)
    }

    fn list_table_foreign_keys(
        &self,
        table: &str,
    ) -> Result<Vec<ForeignKeyMetadata>, IntrospectionError> {
        (**self).list_table_foreign_keys(table)
    }

    fn register_type_override(
        &mut self,
        raw_type: &str,
        semantic: SemanticType,
    ) -> Result<(), IntrospectionError> {
        (**self).register_type_override(raw_type, semantic)
    }
}
