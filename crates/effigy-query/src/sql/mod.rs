pub mod add_index;
pub mod create_table;
pub mod delete_table;
pub mod helpers;
pub mod mutation;
pub mod select;
pub mod types;

pub use helpers::*;
pub use mutation::{build_delete, build_insert, build_update};
pub use select::{Filter, FilterOp, SelectQuery, check_column};
pub use types::{BuiltQuery, DatabaseBackend};

use effigy_core::TableDef;

use self::{add_index::build_add_index, create_table::build_create_table};

/// CREATE TABLE followed by one CREATE INDEX per declared index.
pub fn build_table_queries(
    backend: DatabaseBackend,
    table: &TableDef,
    if_not_exists: bool,
) -> Vec<BuiltQuery> {
    let mut queries = vec![build_create_table(backend, table, if_not_exists)];
    queries.extend(
        table
            .indexes
            .iter()
            .map(|index| build_add_index(&table.name, index)),
    );
    queries
}
