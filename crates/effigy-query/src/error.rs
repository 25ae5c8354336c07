use effigy_core::SchemaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("column '{column}' does not exist on table {table}. Available columns: {available}")]
    UnknownColumn {
        table: String,
        column: String,
        available: String,
    },
    #[error("{0}")]
    Other(String),
}
