use effigy_core::MetaData;

use crate::error::QueryError;
use crate::sql::delete_table::build_delete_table;
use crate::sql::{BuiltQuery, DatabaseBackend, build_table_queries};

/// DDL for every table, referenced tables first.
pub fn build_create_schema(
    metadata: &MetaData,
    backend: DatabaseBackend,
    if_not_exists: bool,
) -> Result<Vec<BuiltQuery>, QueryError> {
    let mut queries: Vec<BuiltQuery> = Vec::new();
    for table in metadata.sorted_tables()? {
        queries.extend(build_table_queries(backend, table, if_not_exists));
    }
    Ok(queries)
}

/// DROP TABLE for every table, dependents first.
pub fn build_drop_schema(metadata: &MetaData, if_exists: bool) -> Result<Vec<BuiltQuery>, QueryError> {
    Ok(metadata
        .sorted_tables()?
        .into_iter()
        .rev()
        .map(|table| build_delete_table(&table.name, if_exists))
        .collect())
}
