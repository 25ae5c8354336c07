use effigy_core::{
    ColumnType, EntityType, FieldDecl, FieldType, ScalarType, SimpleColumnType,
};

use crate::error::BuilderError;

/// How a declared field participates in table synthesis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldClass {
    /// Name carries the internal marker prefix.
    Internal,
    /// `list`, `set` or `dict`: a navigation collection, never a column.
    Collection,
    /// Reference to another entity, handled by relationship configuration.
    Relationship { target: String },
    /// A stored column.
    Scalar { scalar: ScalarType, optional: bool },
}

pub const INTERNAL_PREFIX: char = '_';

pub fn classify_field(entity: &EntityType, field: &FieldDecl) -> Result<FieldClass, BuilderError> {
    if field.name.starts_with(INTERNAL_PREFIX) {
        return Ok(FieldClass::Internal);
    }

    let (ty, optional) = match &field.ty {
        FieldType::Union(_) => match field.ty.optional_inner() {
            Some(inner) => (inner, true),
            None => {
                return Err(BuilderError::UnsupportedUnion {
                    entity: entity.name().to_string(),
                    field: field.name.clone(),
                    ty: field.ty.to_string(),
                });
            }
        },
        ty => (ty, false),
    };

    let class = match ty {
        FieldType::Collection { .. } => FieldClass::Collection,
        FieldType::Entity(target) => FieldClass::Relationship {
            target: target.clone(),
        },
        FieldType::Scalar(scalar) => FieldClass::Scalar {
            scalar: scalar.clone(),
            optional,
        },
        // A bare `None` annotation carries no type; it falls back to nullable text.
        FieldType::None => FieldClass::Scalar {
            scalar: ScalarType::Other("None".into()),
            optional: true,
        },
        FieldType::Union(_) => {
            return Err(BuilderError::UnsupportedUnion {
                entity: entity.name().to_string(),
                field: field.name.clone(),
                ty: field.ty.to_string(),
            });
        }
    };
    Ok(class)
}

/// Column type for a scalar. Scalars without a dedicated mapping are stored as text.
pub fn column_type(scalar: &ScalarType) -> ColumnType {
    let simple = match scalar {
        ScalarType::Integer => SimpleColumnType::Integer,
        ScalarType::Float => SimpleColumnType::Float,
        ScalarType::Boolean => SimpleColumnType::Boolean,
        ScalarType::Text => SimpleColumnType::Text,
        ScalarType::Bytes => SimpleColumnType::Bytea,
        ScalarType::Date => SimpleColumnType::Date,
        ScalarType::DateTime => SimpleColumnType::Timestamp,
        ScalarType::Uuid => SimpleColumnType::Uuid,
        ScalarType::Decimal => SimpleColumnType::Decimal,
        ScalarType::Json => SimpleColumnType::Json,
        ScalarType::Other(_) => SimpleColumnType::Text,
    };
    ColumnType::Simple(simple)
}
