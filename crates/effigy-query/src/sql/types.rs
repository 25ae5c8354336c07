use std::fmt;

use super::helpers::{build_query_statement, build_schema_statement};

/// Database backend for SQL generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatabaseBackend {
    Postgres,
    MySql,
    Sqlite,
}

impl DatabaseBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            DatabaseBackend::Postgres => "postgres",
            DatabaseBackend::MySql => "mysql",
            DatabaseBackend::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for DatabaseBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A built statement that can be rendered for any database backend
#[derive(Debug, Clone)]
pub enum BuiltQuery {
    CreateTable(Box<sea_query::TableCreateStatement>),
    DropTable(Box<sea_query::TableDropStatement>),
    CreateIndex(Box<sea_query::IndexCreateStatement>),
    Select(Box<sea_query::SelectStatement>),
    Insert(Box<sea_query::InsertStatement>),
    Update(Box<sea_query::UpdateStatement>),
    Delete(Box<sea_query::DeleteStatement>),
}

impl BuiltQuery {
    /// Build SQL string for the specified database backend
    pub fn build(&self, backend: DatabaseBackend) -> String {
        match self {
            BuiltQuery::CreateTable(stmt) => build_schema_statement(stmt.as_ref(), backend),
            BuiltQuery::DropTable(stmt) => build_schema_statement(stmt.as_ref(), backend),
            BuiltQuery::CreateIndex(stmt) => build_schema_statement(stmt.as_ref(), backend),
            BuiltQuery::Select(stmt) => build_query_statement(stmt.as_ref(), backend),
            BuiltQuery::Insert(stmt) => build_query_statement(stmt.as_ref(), backend),
            BuiltQuery::Update(stmt) => build_query_statement(stmt.as_ref(), backend),
            BuiltQuery::Delete(stmt) => build_query_statement(stmt.as_ref(), backend),
        }
    }

    pub fn is_ddl(&self) -> bool {
        matches!(
            self,
            BuiltQuery::CreateTable(_) | BuiltQuery::DropTable(_) | BuiltQuery::CreateIndex(_)
        )
    }
}
