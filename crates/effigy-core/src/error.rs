use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityError {
    #[error("entity name must not be empty")]
    EmptyName,
    #[error("entity {0} has an empty table name")]
    EmptyTableName(String),
    #[error("entity {entity} declares field '{field}' more than once")]
    DuplicateField { entity: String, field: String },
    #[error(
        "property '{field}' does not exist on entity {entity}. Available properties: {available}"
    )]
    UnknownField {
        entity: String,
        field: String,
        available: String,
    },
    #[error("entity {entity} field '{field}': {source}")]
    InvalidFieldType {
        entity: String,
        field: String,
        #[source]
        source: FieldTypeParseError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid type annotation '{input}': {reason}")]
pub struct FieldTypeParseError {
    pub input: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("table already exists: {0}")]
    TableExists(String),
    #[error("table not found: {0}")]
    TableNotFound(String),
    #[error("entity is not mapped: {0}")]
    EntityNotMapped(String),
    #[error("circular foreign key dependency detected among tables: {0:?}")]
    CircularDependency(Vec<String>),
}
