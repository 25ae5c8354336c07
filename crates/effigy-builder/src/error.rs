use effigy_core::{EntityError, RelationshipKind, SchemaError};
use thiserror::Error;

/// Broad class of a builder failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid configuration: missing keys, unresolved entities, missing columns.
    Configuration,
    /// A declared type cannot take the requested shape.
    TypeShape,
    /// A referenced field or entity does not exist.
    Lookup,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuilderError {
    #[error(transparent)]
    Entity(#[from] EntityError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("entity {entity} is not registered. Known entities: {known}")]
    UnknownEntity { entity: String, known: String },
    #[error("entity {entity}: table {table} must have at least one primary key")]
    MissingPrimaryKey { entity: String, table: String },
    #[error("entity {entity}: must specify at least one primary key field")]
    EmptyKey { entity: String },
    #[error(
        "Autoincrement only supported on single-column primary keys (entity {entity} declares key {fields})"
    )]
    CompositeAutoincrement { entity: String, fields: String },
    #[error("entity {entity} field '{field}' of type {ty} cannot be a primary key column")]
    KeyNotColumn {
        entity: String,
        field: String,
        ty: String,
    },
    #[error(
        "entity {entity} field '{field}' has unsupported union type: {ty}. Database columns must have a single type; use Optional[T] or T | None for nullable columns"
    )]
    UnsupportedUnion {
        entity: String,
        field: String,
        ty: String,
    },
    #[error(
        "database-generated values require an optional type. Autoincrementing field {entity}.{field} must be declared as int | None, not {ty}"
    )]
    AutoincrementType {
        entity: String,
        field: String,
        ty: String,
    },
    #[error("entity {entity} field '{field}': max_len() can only be used on str fields, not {ty}")]
    MaxLenOnNonText {
        entity: String,
        field: String,
        ty: String,
    },
    #[error("entity {entity}: must specify at least one field to index")]
    EmptyIndex { entity: String },
    #[error(
        "index {index} on entity {entity} references '{field}', which is not a column of its table. Available columns: {available}"
    )]
    IndexColumnNotFound {
        entity: String,
        index: String,
        field: String,
        available: String,
    },
    #[error(
        "navigation '{navigation}' on entity {entity} has type {ty}, which does not name a related entity"
    )]
    InvalidNavigation {
        entity: String,
        navigation: String,
        ty: String,
    },
    #[error(
        "cannot resolve forward reference '{target}' for relationship '{navigation}' on entity {entity}. Known entities: {known}"
    )]
    UnresolvedReference {
        entity: String,
        navigation: String,
        target: String,
        known: String,
    },
    #[error(
        "cannot create relationship '{navigation}' on {entity}: the related entity {related} is not configured in the builder. Configure it with builder.entity(\"{related}\")"
    )]
    RelatedNotConfigured {
        entity: String,
        navigation: String,
        related: String,
    },
    #[error(
        "cannot create relationship '{navigation}' on {entity}: the foreign key column '{column}' does not exist on {owner}. Available columns: {available}"
    )]
    ForeignKeyNotFound {
        entity: String,
        navigation: String,
        column: String,
        owner: String,
        available: String,
    },
    #[error(
        "with_foreign_key() is not applicable to many-to-many relationship '{navigation}' on {entity}; association tables carry their own foreign keys"
    )]
    ForeignKeyOnManyToMany { entity: String, navigation: String },
    #[error(
        "with_many() can only be called on one-to-many relationships; '{navigation}' on {entity} is {kind}"
    )]
    WithManyOnNonOneToMany {
        entity: String,
        navigation: String,
        kind: RelationshipKind,
    },
    #[error(
        "cannot create association table {table}: both {left} and {right} must have primary keys"
    )]
    AssociationWithoutKey {
        table: String,
        left: String,
        right: String,
    },
    #[error(
        "cannot use {table} as the association table for '{navigation}' on {entity}: it is the table of entity {owner}"
    )]
    AssociationNameTaken {
        table: String,
        entity: String,
        navigation: String,
        owner: String,
    },
}

impl BuilderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BuilderError::Entity(EntityError::UnknownField { .. }) => ErrorKind::Lookup,
            BuilderError::Entity(EntityError::InvalidFieldType { .. }) => ErrorKind::TypeShape,
            BuilderError::UnknownEntity { .. } => ErrorKind::Lookup,
            BuilderError::UnsupportedUnion { .. }
            | BuilderError::AutoincrementType { .. }
            | BuilderError::KeyNotColumn { .. }
            | BuilderError::InvalidNavigation { .. } => ErrorKind::TypeShape,
            _ => ErrorKind::Configuration,
        }
    }
}
