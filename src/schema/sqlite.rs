//! Schema introspection of a live SQLite database

use std::collections::BTreeMap;
use std::path::Path;

use rusqlite::{Connection, OpenFlags};

use super::metadata::{ColumnMetadata, ForeignKeyMetadata, IndexMetadata, SemanticType};
use super::registry::{RawColumn, TypeRegistry};
use super::{IntrospectionError, SchemaIntrospector};

const LIST_TABLES_SQL: &str = "SELECT name FROM sqlite_master \
     WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name";

/// Introspector reading `sqlite_master` and the table-valued pragma functions.
pub struct SqliteIntrospector {
    connection: Connection,
    registry: TypeRegistry,
}

impl SqliteIntrospector {
    /// Open an existing database file read-only.
    pub fn open(path: &Path) -> Result<Self, IntrospectionError> {
        let connection = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self::from_connection(connection))
    }

    pub fn from_connection(connection: Connection) -> Self {
        Self {
            connection,
            registry: TypeRegistry::default(),
        }
    }

    fn ensure_table(&self, table: &str) -> Result<(), IntrospectionError> {
        let exists: bool = self.connection.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
            [table],
            |row| row.get(0),
        )?;
        if exists {
            Ok(())
        } else {
            Err(IntrospectionError::TableNotFound(table.to_string()))
        }
    }

    /// Primary key columns ordered by their position in the key.
    fn primary_key_columns(&self, table: &str) -> Result<Vec<String>, IntrospectionError> {
        let mut stmt = self
            .connection
            .prepare("SELECT name FROM pragma_table_info(?1) WHERE pk > 0 ORDER BY pk")?;
        let columns = stmt
            .query_map([table], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(columns)
    }
}

impl SchemaIntrospector for SqliteIntrospector {
    fn list_table_names(&self) -> Result<Vec<String>, IntrospectionError> {
        let mut stmt = self.connection.prepare(LIST_TABLES_SQL)?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }

    fn list_table_columns(&self, table: &str) -> Result<Vec<ColumnMetadata>, IntrospectionError> {
        self.ensure_table(table)?;
        let primary_key = self.primary_key_columns(table)?;

        let mut stmt = self.connection.prepare(
            "SELECT name, type, \"notnull\", dflt_value, pk FROM pragma_table_info(?1) ORDER BY cid",
        )?;
        let rows = stmt
            .query_map([table], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, bool>(2)?,
                    row.get::<_, Option<String>>(3)?,
                    row.get::<_, i64>(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(name, raw_type, not_null, default, pk)| {
                // A single INTEGER PRIMARY KEY column aliases the rowid.
                let rowid_alias = pk > 0
                    && primary_key.len() == 1
                    && raw_type.eq_ignore_ascii_case("integer");
                RawColumn {
                    name,
                    raw_type,
                    nullable: !not_null && pk == 0,
                    default: default.map(|d| unquote_default(&d)),
                    autoincrement: rowid_alias,
                }
                .resolve(&self.registry)
            })
            .collect()
    }

    fn list_table_indexes(&self, table: &str) -> Result<Vec<IndexMetadata>, IntrospectionError> {
        self.ensure_table(table)?;
        let mut indexes = Vec::new();

        let primary_key = self.primary_key_columns(table)?;
        if !primary_key.is_empty() {
            indexes.push(IndexMetadata::primary(primary_key));
        }

        let mut list = self
            .connection
            .prepare("SELECT name, \"unique\", origin FROM pragma_index_list(?1) ORDER BY seq DESC")?;
        let entries = list
            .query_map([table], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, bool>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut info = self
            .connection
            .prepare("SELECT name FROM pragma_index_info(?1) ORDER BY seqno")?;
        for (name, unique, origin) in entries {
            if origin == "pk" {
                continue;
            }
            // Expression index members have no column name.
            let columns: Vec<String> = info
                .query_map([name.as_str()], |row| row.get::<_, Option<String>>(0))?
                .collect::<Result<Vec<_>, _>>()?
                .into_iter()
                .flatten()
                .collect();
            indexes.push(IndexMetadata::new(name, columns, unique));
        }

        Ok(indexes)
    }

    fn list_table_foreign_keys(
        &self,
        table: &str,
    ) -> Result<Vec<ForeignKeyMetadata>, IntrospectionError> {
        self.ensure_table(table)?;
        let mut stmt = self.connection.prepare(
            "SELECT id, \"table\", \"from\", \"to\" FROM pragma_foreign_key_list(?1) ORDER BY id DESC, seq",
        )?;
        let rows = stmt
            .query_map([table], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<String>>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        // SQLite numbers constraints in reverse declaration order.
        let mut grouped: BTreeMap<std::cmp::Reverse<i64>, ForeignKeyMetadata> = BTreeMap::new();
        for (id, foreign_table, from, to) in rows {
            let fk = grouped
                .entry(std::cmp::Reverse(id))
                .or_insert_with(|| ForeignKeyMetadata {
                    name: None,
                    local_columns: Vec::new(),
                    foreign_table,
                    foreign_columns: Vec::new(),
                });
            fk.local_columns.push(from);
            // `to` is NULL when the constraint references the primary key implicitly.
            if let Some(to) = to {
                fk.foreign_columns.push(to);
            }
        }

        Ok(grouped.into_values().collect())
    }

    fn register_type_override(
        &mut self,
        raw_type: &str,
        semantic: SemanticType,
    ) -> Result<(), IntrospectionError> {
        self.registry.register(raw_type, semantic)
    }
}

/// `dflt_value` holds the SQL text of the default; strip string quoting.
fn unquote_default(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('\'') && trimmed.ends_with('\'') {
        trimmed[1..trimmed.len() - 1].replace("''", "'")
    } else {
        trimmed.to_string()
    }
}
