use sea_query::{Alias, ForeignKey, Index, Table, TableCreateStatement};

use effigy_core::TableDef;

use super::helpers::build_sea_column_def;
use super::types::{BuiltQuery, DatabaseBackend};

fn build_create_table_for_backend(
    backend: DatabaseBackend,
    table: &TableDef,
    if_not_exists: bool,
) -> TableCreateStatement {
    let mut stmt = Table::create().table(Alias::new(&table.name)).to_owned();
    if if_not_exists {
        stmt.if_not_exists();
    }

    let pk_columns: Vec<&str> = table
        .primary_key_columns()
        .map(|c| c.name.as_str())
        .collect();
    let inline_primary_key = pk_columns.len() == 1;

    for column in &table.columns {
        let col = build_sea_column_def(backend, column, inline_primary_key);
        stmt.col(col);
    }

    // Composite keys become a table-level constraint
    if pk_columns.len() > 1 {
        let mut pk_idx = Index::create();
        for c in &pk_columns {
            pk_idx.col(Alias::new(*c));
        }
        stmt.primary_key(&mut pk_idx);
    }

    for fk_def in &table.foreign_keys {
        let mut fk = ForeignKey::create();
        fk.name(&fk_def.name).from_tbl(Alias::new(&table.name));
        for col in &fk_def.columns {
            fk.from_col(Alias::new(col));
        }
        fk.to_tbl(Alias::new(&fk_def.ref_table));
        for col in &fk_def.ref_columns {
            fk.to_col(Alias::new(col));
        }
        stmt.foreign_key(&mut fk);
    }

    stmt
}

pub fn build_create_table(
    backend: DatabaseBackend,
    table: &TableDef,
    if_not_exists: bool,
) -> BuiltQuery {
    BuiltQuery::CreateTable(Box::new(build_create_table_for_backend(
        backend,
        table,
        if_not_exists,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use effigy_core::{ColumnDef, ColumnType, ForeignKeyDef, SimpleColumnType};
    use rstest::rstest;

    fn col(name: &str, ty: SimpleColumnType, pk: bool) -> ColumnDef {
        let mut col = ColumnDef::new(name, ColumnType::Simple(ty));
        col.primary_key = pk;
        col
    }

    fn users() -> TableDef {
        let mut name = col("name", SimpleColumnType::Text, false);
        name.nullable = true;
        TableDef::new(
            "users",
            Some("User".into()),
            vec![col("id", SimpleColumnType::Integer, true), name],
        )
    }

    fn posts_tags() -> TableDef {
        let mut table = TableDef::new(
            "posts_tags",
            None,
            vec![
                col("posts_id", SimpleColumnType::Integer, true),
                col("tags_id", SimpleColumnType::Integer, true),
            ],
        );
        table.foreign_keys = vec![
            ForeignKeyDef {
                name: "fk_posts_tags_posts_id".into(),
                columns: vec!["posts_id".into()],
                ref_table: "posts".into(),
                ref_columns: vec!["id".into()],
            },
            ForeignKeyDef {
                name: "fk_posts_tags_tags_id".into(),
                columns: vec!["tags_id".into()],
                ref_table: "tags".into(),
                ref_columns: vec!["id".into()],
            },
        ];
        table
    }

    #[rstest]
    #[case::create_table_postgres(
        DatabaseBackend::Postgres,
        &["CREATE TABLE \"users\"", "\"id\" integer NOT NULL PRIMARY KEY", "\"name\" text"]
    )]
    #[case::create_table_mysql(
        DatabaseBackend::MySql,
        &["CREATE TABLE `users`", "`id` int NOT NULL PRIMARY KEY", "`name` text"]
    )]
    #[case::create_table_sqlite(
        DatabaseBackend::Sqlite,
        &["CREATE TABLE \"users\"", "\"id\" integer NOT NULL PRIMARY KEY", "\"name\" text"]
    )]
    fn test_create_table(#[case] backend: DatabaseBackend, #[case] expected: &[&str]) {
        let sql = build_create_table(backend, &users(), false).build(backend);
        for exp in expected {
            assert!(
                sql.contains(exp),
                "Expected SQL to contain '{}', got: {}",
                exp,
                sql
            );
        }
        assert!(!sql.contains("\"name\" text NOT NULL"), "got: {}", sql);
    }

    #[rstest]
    #[case::association_postgres(
        DatabaseBackend::Postgres,
        &[
            "PRIMARY KEY (\"posts_id\", \"tags_id\")",
            "CONSTRAINT \"fk_posts_tags_posts_id\" FOREIGN KEY (\"posts_id\") REFERENCES \"posts\" (\"id\")",
            "CONSTRAINT \"fk_posts_tags_tags_id\" FOREIGN KEY (\"tags_id\") REFERENCES \"tags\" (\"id\")",
        ]
    )]
    #[case::association_mysql(
        DatabaseBackend::MySql,
        &[
            "PRIMARY KEY (`posts_id`, `tags_id`)",
            "FOREIGN KEY (`posts_id`) REFERENCES `posts` (`id`)",
        ]
    )]
    fn test_create_association_table(#[case] backend: DatabaseBackend, #[case] expected: &[&str]) {
        let sql = build_create_table(backend, &posts_tags(), false).build(backend);
        for exp in expected {
            assert!(
                sql.contains(exp),
                "Expected SQL to contain '{}', got: {}",
                exp,
                sql
            );
        }
        assert!(!sql.contains("\"posts_id\" integer NOT NULL PRIMARY KEY"), "got: {}", sql);
    }

    #[test]
    fn test_if_not_exists() {
        let sql = build_create_table(DatabaseBackend::Sqlite, &users(), true)
            .build(DatabaseBackend::Sqlite);
        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS \"users\""), "got: {}", sql);
    }
}
