pub mod builder;
pub mod error;
pub mod sql;

pub use builder::{build_create_schema, build_drop_schema};
pub use error::QueryError;
pub use sql::{
    BuiltQuery, DatabaseBackend, Filter, FilterOp, SelectQuery, build_delete, build_insert,
    build_table_queries, build_update,
};
