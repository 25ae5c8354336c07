use sea_query::{Alias, Table};

use super::types::BuiltQuery;

pub fn build_delete_table(table: &str, if_exists: bool) -> BuiltQuery {
    let mut stmt = Table::drop().table(Alias::new(table)).to_owned();
    if if_exists {
        stmt.if_exists();
    }
    BuiltQuery::DropTable(Box::new(stmt))
}
