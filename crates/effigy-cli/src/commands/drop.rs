use anyhow::Result;
use effigy_config::ProviderKind;

use super::sql::emit_statements;
use crate::utils::{load_config, open_database};

pub fn cmd_drop(provider: Option<ProviderKind>) -> Result<()> {
    let config = load_config()?;
    let db = open_database(&config, provider)?;
    let statements = db.drop_schema_sql()?;
    emit_statements(db.backend().as_str(), &statements);
    Ok(())
}
