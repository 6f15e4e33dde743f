//! Schema introspection from a DDL snapshot
//!
//! Reads `CREATE TABLE`, `CREATE INDEX` and `ALTER TABLE ... ADD CONSTRAINT`
//! statements from a schema dump. Other statements are ignored.

use std::path::Path;
use std::str::FromStr;

use encoding_rs::WINDOWS_1252;
use sqlparser::ast::{
    AlterTableOperation, ColumnDef, ColumnOption, Expr, Ident, ObjectName, Statement,
    TableConstraint, Value,
};
use sqlparser::dialect::{Dialect, GenericDialect, MySqlDialect, PostgreSqlDialect, SQLiteDialect};
use sqlparser::parser::Parser;

use super::metadata::{ColumnMetadata, ForeignKeyMetadata, IndexMetadata, SemanticType};
use super::registry::{RawColumn, TypeRegistry};
use super::{IntrospectionError, SchemaIntrospector};

/// SQL dialect used to parse a schema dump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DdlDialect {
    #[default]
    Generic,
    MySql,
    Postgres,
    Sqlite,
}

impl FromStr for DdlDialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "generic" | "ansi" => Ok(DdlDialect::Generic),
            "mysql" | "mariadb" => Ok(DdlDialect::MySql),
            "postgres" | "postgresql" | "pgsql" => Ok(DdlDialect::Postgres),
            "sqlite" => Ok(DdlDialect::Sqlite),
            _ => Err(format!("Unknown DDL dialect: {}", s)),
        }
    }
}

impl DdlDialect {
    fn parser_dialect(&self) -> Box<dyn Dialect> {
        match self {
            DdlDialect::Generic => Box::new(GenericDialect {}),
            DdlDialect::MySql => Box::new(MySqlDialect {}),
            DdlDialect::Postgres => Box::new(PostgreSqlDialect {}),
            DdlDialect::Sqlite => Box::new(SQLiteDialect {}),
        }
    }
}

#[derive(Debug, Clone)]
struct DdlTable {
    name: String,
    columns: Vec<RawColumn>,
    indexes: Vec<IndexMetadata>,
    foreign_keys: Vec<ForeignKeyMetadata>,
}

/// Introspector backed by a parsed schema dump.
#[derive(Debug, Clone)]
pub struct DdlIntrospector {
    tables: Vec<DdlTable>,
    registry: TypeRegistry,
}

impl DdlIntrospector {
    /// Parse a schema dump from disk.
    pub fn from_path(path: &Path, dialect: DdlDialect) -> Result<Self, IntrospectionError> {
        let sql = read_file_with_encoding_fallback(path).map_err(|e| IntrospectionError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_sql(&sql, dialect)
    }

    /// Parse a schema dump held in memory.
    pub fn from_sql(sql: &str, dialect: DdlDialect) -> Result<Self, IntrospectionError> {
        let sql = sql.strip_prefix('\u{feff}').unwrap_or(sql);
        let parser_dialect = dialect.parser_dialect();
        let statements = Parser::parse_sql(parser_dialect.as_ref(), sql).map_err(|e| {
            IntrospectionError::DdlParse {
                message: e.to_string(),
            }
        })?;

        let mut introspector = Self {
            tables: Vec::new(),
            registry: TypeRegistry::default(),
        };
        for statement in &statements {
            introspector.apply_statement(statement);
        }

        Ok(introspector)
    }

    fn apply_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::CreateTable(create_table) => {
                let name = object_name(&create_table.name);
                let mut table = DdlTable {
                    name: name.clone(),
                    columns: Vec::with_capacity(create_table.columns.len()),
                    indexes: Vec::new(),
                    foreign_keys: Vec::new(),
                };

                for column in &create_table.columns {
                    apply_column(&mut table, column);
                }
                for constraint in &create_table.constraints {
                    apply_table_constraint(&mut table, constraint);
                }

                self.tables.retain(|t| t.name != name);
                self.tables.push(table);
            }

            Statement::CreateIndex(create_index) => {
                let table_name = object_name(&create_index.table_name);
                let columns: Vec<String> = create_index
                    .columns
                    .iter()
                    .map(|c| expr_column_name(&c.expr))
                    .collect();
                let index_name = create_index
                    .name
                    .as_ref()
                    .map(object_name)
                    .unwrap_or_else(|| generated_index_name(&table_name, &columns, create_index.unique));

                match self.table_mut(&table_name) {
                    Some(table) => table
                        .indexes
                        .push(IndexMetadata::new(index_name, columns, create_index.unique)),
                    None => tracing::debug!(
                        table = %table_name,
                        index = %index_name,
                        "ignoring index on undeclared table"
                    ),
                }
            }

            Statement::AlterTable {
                name, operations, ..
            } => {
                let table_name = object_name(name);
                let Some(table) = self.table_mut(&table_name) else {
                    tracing::debug!(table = %table_name, "ignoring ALTER TABLE on undeclared table");
                    return;
                };
                for operation in operations {
                    if let AlterTableOperation::AddConstraint(constraint) = operation {
                        apply_table_constraint(table, constraint);
                    }
                }
            }

            _ => {}
        }
    }

    fn table(&self, name: &str) -> Result<&DdlTable, IntrospectionError> {
        self.tables
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| IntrospectionError::TableNotFound(name.to_string()))
    }

    fn table_mut(&mut self, name: &str) -> Option<&mut DdlTable> {
        self.tables.iter_mut().find(|t| t.name == name)
    }
}

impl SchemaIntrospector for DdlIntrospector {
    fn list_table_names(&self) -> Result<Vec<String>, IntrospectionError> {
        Ok(self.tables.iter().map(|t| t.name.clone()).collect())
    }

    fn list_table_columns(&self, table: &str) -> Result<Vec<ColumnMetadata>, IntrospectionError> {
        self.table(table)?
            .columns
            .iter()
            .map(|c| c.resolve(&self.registry))
            .collect()
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
        semantic: SemanticType,
    ) -> Result<(), IntrospectionError> {
        self.registry.register(raw_type, semantic)
    }
}

fn apply_column(table: &mut DdlTable, column: &ColumnDef) {
    let name = column.name.value.clone();
    let mut raw = RawColumn {
        name: name.clone(),
        raw_type: column.data_type.to_string(),
        nullable: true,
        default: None,
        autoincrement: false,
    };

    for option in &column.options {
        match &option.option {
            ColumnOption::NotNull => raw.nullable = false,
            ColumnOption::Null => raw.nullable = true,
            ColumnOption::Default(expr) => raw.default = default_literal(expr),
            ColumnOption::Identity(_) => raw.autoincrement = true,
            ColumnOption::Generated {
                generation_expr: None,
                ..
            } => raw.autoincrement = true,
            ColumnOption::DialectSpecific(tokens) => {
                if tokens.iter().any(|t| {
                    let token = t.to_string().to_uppercase();
                    token == "AUTO_INCREMENT" || token == "AUTOINCREMENT"
                }) {
                    raw.autoincrement = true;
                }
            }
            ColumnOption::Unique { is_primary, .. } => {
                if *is_primary {
                    raw.nullable = false;
                    set_primary_key(table, vec![name.clone()]);
                } else {
                    let columns = vec![name.clone()];
                    let index_name = option
                        .name
                        .as_ref()
                        .map(|n| n.value.clone())
                        .unwrap_or_else(|| generated_index_name(&table.name, &columns, true));
                    table.indexes.push(IndexMetadata::new(index_name, columns, true));
                }
            }
            ColumnOption::ForeignKey {
                foreign_table,
                referred_columns,
                ..
            } => {
                let mut fk = ForeignKeyMetadata::new(
                    [name.clone()],
                    object_name(foreign_table),
                    referred_columns.iter().map(|c| c.value.clone()),
                );
                fk.name = option.name.as_ref().map(|n| n.value.clone());
                table.foreign_keys.push(fk);
            }
            _ => {}
        }
    }

    table.columns.push(raw);
}

fn apply_table_constraint(table: &mut DdlTable, constraint: &TableConstraint) {
    match constraint {
        TableConstraint::PrimaryKey { columns, .. } => {
            let columns = idents(columns);
            for column in &mut table.columns {
                if columns.contains(&column.name) {
                    column.nullable = false;
                }
            }
            set_primary_key(table, columns);
        }
        TableConstraint::Unique {
            name,
            index_name,
            columns,
            ..
        } => {
            let columns = idents(columns);
            let index_name = index_name
                .as_ref()
                .or(name.as_ref())
                .map(|n| n.value.clone())
                .unwrap_or_else(|| generated_index_name(&table.name, &columns, true));
            table.indexes.push(IndexMetadata::new(index_name, columns, true));
        }
        TableConstraint::Index { name, columns, .. } => {
            let columns = idents(columns);
            let index_name = name
                .as_ref()
                .map(|n| n.value.clone())
                .unwrap_or_else(|| generated_index_name(&table.name, &columns, false));
            table.indexes.push(IndexMetadata::new(index_name, columns, false));
        }
        TableConstraint::ForeignKey {
            name,
            columns,
            foreign_table,
            referred_columns,
            ..
        } => {
            let mut fk =
                ForeignKeyMetadata::new(idents(columns), object_name(foreign_table), idents(referred_columns));
            fk.name = name.as_ref().map(|n| n.value.clone());
            table.foreign_keys.push(fk);
        }
        _ => {}
    }
}

/// Primary key index always comes first.
fn set_primary_key(table: &mut DdlTable, columns: Vec<String>) {
    table.indexes.retain(|i| !i.is_primary());
    table.indexes.insert(0, IndexMetadata::primary(columns));
}

fn object_name(name: &ObjectName) -> String {
    name.0.last().map(|p| p.value.clone()).unwrap_or_default()
}

fn idents(idents: &[Ident]) -> Vec<String> {
    idents.iter().map(|i| i.value.clone()).collect()
}

fn expr_column_name(expr: &Expr) -> String {
    match expr {
        Expr::Identifier(ident) => ident.value.clone(),
        Expr::CompoundIdentifier(parts) => parts.last().map(|p| p.value.clone()).unwrap_or_default(),
        other => other.to_string(),
    }
}

/// Literal value of a DEFAULT clause; `NULL` means no default.
fn default_literal(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Value(Value::Null) => None,
        Expr::Value(Value::SingleQuotedString(s)) | Expr::Value(Value::DoubleQuotedString(s)) => {
            Some(s.clone())
        }
        Expr::Value(Value::Number(n, _)) => Some(n.to_string()),
        Expr::Value(Value::Boolean(b)) => Some(if *b { "1" } else { "0" }.to_string()),
        other => Some(other.to_string()),
    }
}

fn generated_index_name(table: &str, columns: &[String], unique: bool) -> String {
    let prefix = if unique { "uniq" } else { "idx" };
    format!("{}_{}_{}", prefix, table, columns.join("_")).to_lowercase()
}

/// Read a file as a string, trying UTF-8 first, then Windows-1252 as fallback
fn read_file_with_encoding_fallback(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(err) => {
            let bytes = err.into_bytes();
            let (decoded, _, had_errors) = WINDOWS_1252.decode(&bytes);
            if had_errors {
                Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "File contains invalid characters",
                ))
            } else {
                Ok(decoded.into_owned())
            }
        }
    }
}
