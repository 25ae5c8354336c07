use sea_query::{
    Alias, ColumnDef as SeaColumnDef, Expr, MysqlQueryBuilder, PostgresQueryBuilder,
    QueryStatementWriter, SchemaStatementBuilder, SimpleExpr, SqliteQueryBuilder,
};

use effigy_core::{ColumnDef, ColumnType, ComplexColumnType, SimpleColumnType, Value};

use super::types::DatabaseBackend;

/// Helper function to convert a schema statement to SQL for a specific backend
pub fn build_schema_statement<T: SchemaStatementBuilder>(
    stmt: &T,
    backend: DatabaseBackend,
) -> String {
    match backend {
        DatabaseBackend::Postgres => stmt.to_string(PostgresQueryBuilder),
        DatabaseBackend::MySql => stmt.to_string(MysqlQueryBuilder),
        DatabaseBackend::Sqlite => stmt.to_string(SqliteQueryBuilder),
    }
}

/// Helper function to convert a query statement (SELECT, INSERT, etc.) to SQL for a specific backend
pub fn build_query_statement<T: QueryStatementWriter>(stmt: &T, backend: DatabaseBackend) -> String {
    match backend {
        DatabaseBackend::Postgres => stmt.to_string(PostgresQueryBuilder),
        DatabaseBackend::MySql => stmt.to_string(MysqlQueryBuilder),
        DatabaseBackend::Sqlite => stmt.to_string(SqliteQueryBuilder),
    }
}

/// Apply an effigy ColumnType to a sea_query ColumnDef
pub fn apply_column_type(col: &mut SeaColumnDef, ty: &ColumnType) {
    match ty {
        ColumnType::Simple(simple) => match simple {
            SimpleColumnType::Integer => {
                col.integer();
            }
            SimpleColumnType::Float => {
                col.float();
            }
            SimpleColumnType::Boolean => {
                col.boolean();
            }
            SimpleColumnType::Text => {
                col.text();
            }
            SimpleColumnType::Bytea => {
                col.binary();
            }
            SimpleColumnType::Date => {
                col.date();
            }
            SimpleColumnType::Timestamp => {
                col.timestamp();
            }
            SimpleColumnType::Uuid => {
                col.uuid();
            }
            SimpleColumnType::Decimal => {
                col.decimal();
            }
            SimpleColumnType::Json => {
                col.json();
            }
        },
        ColumnType::Complex(ComplexColumnType::Varchar { length }) => {
            col.string_len(*length);
        }
    }
}

/// Convert a server default expression to the appropriate backend-specific expression
pub fn convert_default_for_backend(default: &str, backend: DatabaseBackend) -> String {
    match default {
        "gen_random_uuid()" => match backend {
            DatabaseBackend::Postgres => "gen_random_uuid()".to_string(),
            DatabaseBackend::MySql => "(UUID())".to_string(),
            DatabaseBackend::Sqlite => "(lower(hex(randomblob(16))))".to_string(),
        },
        "current_timestamp()" | "now()" | "CURRENT_TIMESTAMP" => "CURRENT_TIMESTAMP".to_string(),
        other => other.to_string(),
    }
}

/// Build a sea_query ColumnDef from an effigy ColumnDef.
///
/// `inline_primary_key` is false for tables with a composite key, which is
/// emitted as a table-level constraint instead.
pub fn build_sea_column_def(
    backend: DatabaseBackend,
    column: &ColumnDef,
    inline_primary_key: bool,
) -> SeaColumnDef {
    let mut col = SeaColumnDef::new(Alias::new(&column.name));
    apply_column_type(&mut col, &column.r#type);

    if !column.nullable {
        col.not_null();
    }

    if column.primary_key && inline_primary_key {
        col.primary_key();
    }

    if column.auto_increment {
        col.auto_increment();
    }

    if column.unique && !column.primary_key {
        col.unique_key();
    }

    if let Some(default) = &column.server_default {
        let converted = convert_default_for_backend(default, backend);
        col.default(Expr::cust(converted));
    }

    col
}

/// Literal expression for a record value.
pub fn value_expr(value: &Value) -> SimpleExpr {
    match value {
        Value::Null => Expr::cust("NULL"),
        Value::Bool(v) => Expr::val(*v).into(),
        Value::Integer(v) => Expr::val(*v).into(),
        Value::Float(v) => Expr::val(*v).into(),
        Value::Text(v) => Expr::val(v.clone()).into(),
    }
}
