use effigy_builder::BuilderError;
use effigy_core::SchemaError;
use effigy_query::QueryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EffigyError {
    #[error(transparent)]
    Builder(#[from] BuilderError),
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("configuration doesn't specify a provider")]
    MissingProvider,
    #[error("no database provider configured for {context}")]
    NoProvider { context: String },
    #[error("provider {provider} requires a databaseUrl")]
    MissingDatabaseUrl { provider: String },
    #[error("entity {entity} is not part of this database. Known entities: {known}")]
    UnknownEntity { entity: String, known: String },
    #[error("property '{field}' does not exist on entity {entity}. Available properties: {available}")]
    UnknownField {
        entity: String,
        field: String,
        available: String,
    },
    #[error("entity {entity}: '{field}' is required and has no default")]
    MissingValue { entity: String, field: String },
    #[error("entity {entity}: value {value} rejected by validator on '{field}'")]
    ValidationFailed {
        entity: String,
        field: String,
        value: String,
    },
}
