use sea_query::{Alias, Index};

use effigy_core::IndexDef;

use super::types::BuiltQuery;

pub fn build_add_index(table: &str, index: &IndexDef) -> BuiltQuery {
    let mut stmt = Index::create()
        .name(&index.name)
        .table(Alias::new(table))
        .to_owned();

    for col in &index.columns {
        stmt = stmt.col(Alias::new(col)).to_owned();
    }

    if index.unique {
        stmt = stmt.unique().to_owned();
    }

    BuiltQuery::CreateIndex(Box::new(stmt))
}
