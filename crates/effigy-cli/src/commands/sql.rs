use anyhow::Result;
use colored::Colorize;
use effigy_config::ProviderKind;

use crate::utils::{load_config, open_database};

pub fn cmd_sql(provider: Option<ProviderKind>) -> Result<()> {
    let config = load_config()?;
    let db = open_database(&config, provider)?;
    let statements = db.create_schema_sql()?;
    emit_statements(db.backend().as_str(), &statements);
    Ok(())
}

/// Prints numbered statements under a backend header.
pub(crate) fn emit_statements(backend: &str, statements: &[String]) {
    if statements.is_empty() {
        println!("{}", "No models found; no SQL to emit.".bright_yellow());
        return;
    }

    println!(
        "{} {}",
        "Backend:".bright_cyan().bold(),
        backend.bright_magenta()
    );
    println!(
        "{} {}",
        "SQL statements:".bright_cyan().bold(),
        statements.len().to_string().bright_yellow().bold()
    );
    println!();

    for (i, sql) in statements.iter().enumerate() {
        println!(
            "{}. {};",
            (i + 1).to_string().bright_magenta().bold(),
            sql.trim().bright_white()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::testing::{CwdGuard, write_blog_models, write_config};
    use effigy_config::EffigyConfig;
    use rstest::rstest;
    use serial_test::serial;
    use tempfile::tempdir;

    #[rstest]
    #[case(None)]
    #[case(Some(ProviderKind::InMemory))]
    #[serial]
    fn cmd_sql_renders_models(#[case] provider: Option<ProviderKind>) {
        let tmp = tempdir().unwrap();
        let _guard = CwdGuard::new(tmp.path());
        write_config(&EffigyConfig::default());
        write_blog_models();

        cmd_sql(provider).unwrap();
    }

    #[test]
    #[serial]
    fn cmd_sql_with_no_models_succeeds() {
        let tmp = tempdir().unwrap();
        let _guard = CwdGuard::new(tmp.path());
        write_config(&EffigyConfig::default());

        cmd_sql(None).unwrap();
    }

    #[test]
    #[serial]
    fn cmd_sql_postgres_needs_url() {
        let tmp = tempdir().unwrap();
        let _guard = CwdGuard::new(tmp.path());
        write_config(&EffigyConfig::default());
        write_blog_models();

        let err = cmd_sql(Some(ProviderKind::Postgres)).unwrap_err();
        assert!(format!("{err:#}").contains("requires a databaseUrl"), "got: {err:#}");
    }

    #[test]
    #[serial]
    fn cmd_sql_requires_config() {
        let tmp = tempdir().unwrap();
        let _guard = CwdGuard::new(tmp.path());
        assert!(cmd_sql(None).is_err());
    }
}
