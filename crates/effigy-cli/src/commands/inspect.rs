use anyhow::Result;
use colored::Colorize;
use effigy::Database;
use effigy_core::{ColumnDef, TableDef};

use crate::utils::{load_config, open_database};

pub fn cmd_inspect() -> Result<()> {
    let config = load_config()?;
    let db = open_database(&config, None)?;

    if db.metadata().is_empty() {
        println!("{}", "No models found.".bright_yellow());
        return Ok(());
    }

    for table in db.metadata().sorted_tables()? {
        let owner = table.entity.as_deref().unwrap_or("association");
        println!(
            "{} {}",
            table.name.bright_cyan().bold(),
            format!("({owner})").bright_white()
        );
        for line in describe_table(table) {
            println!("  {line}");
        }
        for line in describe_relationships(&db, table) {
            println!("  {}", line.bright_green());
        }
        println!();
    }
    Ok(())
}

fn column_flags(column: &ColumnDef) -> String {
    let mut flags = Vec::new();
    if column.primary_key {
        flags.push("pk".to_string());
    }
    if column.auto_increment {
        flags.push("autoincrement".to_string());
    }
    if column.unique {
        flags.push("unique".to_string());
    }
    flags.push(if column.nullable { "null" } else { "not null" }.to_string());
    if let Some(default) = &column.default {
        flags.push(format!("default {default}"));
    }
    if let Some(server_default) = &column.server_default {
        flags.push(format!("server default {server_default}"));
    }
    flags.join(", ")
}

/// One line per column, index and foreign key.
pub(crate) fn describe_table(table: &TableDef) -> Vec<String> {
    let mut lines: Vec<String> = table
        .columns
        .iter()
        .map(|c| format!("{} {} [{}]", c.name, c.r#type, column_flags(c)))
        .collect();
    for index in &table.indexes {
        let kind = if index.unique { "unique index" } else { "index" };
        lines.push(format!("{kind} {} ({})", index.name, index.columns.join(", ")));
    }
    for fk in &table.foreign_keys {
        lines.push(format!(
            "foreign key {} ({}) -> {} ({})",
            fk.name,
            fk.columns.join(", "),
            fk.ref_table,
            fk.ref_columns.join(", ")
        ));
    }
    lines
}

fn describe_relationships(db: &Database, table: &TableDef) -> Vec<String> {
    let Some(mapper) = table.entity.as_deref().and_then(|e| db.mappings().mapper(e)) else {
        return Vec::new();
    };
    mapper
        .relationships()
        .map(|rel| {
            let mut line = format!("{} -> {} ({})", rel.navigation, rel.target, rel.kind);
            if let Some(secondary) = &rel.secondary {
                line.push_str(&format!(" via {secondary}"));
            }
            if let Some(back) = &rel.back_populates {
                line.push_str(&format!(" back-populates {back}"));
            }
            line
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::testing::{CwdGuard, write_blog_models, write_config};
    use effigy_config::EffigyConfig;
    use serial_test::serial;
    use tempfile::tempdir;

    #[test]
    #[serial]
    fn describe_blog_tables() {
        let tmp = tempdir().unwrap();
        let _guard = CwdGuard::new(tmp.path());
        write_blog_models();

        let db = open_database(&EffigyConfig::default(), None).unwrap();
        let users = describe_table(db.metadata().table("users").unwrap());
        assert_eq!(
            users,
            vec![
                "id integer [pk, autoincrement, not null]",
                "email varchar(120) [unique, not null]",
            ]
        );

        let posts = describe_table(db.metadata().table("posts").unwrap());
        assert!(posts.contains(&"index ix_posts_title (title)".to_string()), "{posts:?}");
        assert!(
            posts.contains(&"foreign key fk_posts_user_id (user_id) -> users (id)".to_string()),
            "{posts:?}"
        );

        let relationships = describe_relationships(&db, db.metadata().table("users").unwrap());
        assert_eq!(relationships, vec!["posts -> Post (one-to-many)"]);
    }

    #[test]
    #[serial]
    fn cmd_inspect_runs() {
        let tmp = tempdir().unwrap();
        let _guard = CwdGuard::new(tmp.path());
        write_config(&EffigyConfig::default());
        write_blog_models();

        cmd_inspect().unwrap();
    }
}
