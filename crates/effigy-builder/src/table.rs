use effigy_core::{ColumnDef, ColumnType, ComplexColumnType, EntityType, TableDef};
use indexmap::IndexMap;

use crate::classify::{FieldClass, classify_field, column_type};
use crate::error::BuilderError;
use crate::property::PropertyConfiguration;

/// Synthesizes the table for `entity`.
///
/// Columns follow field declaration order. Collection, relationship and
/// internal fields produce no column. Fails before emitting any column when
/// no primary key is declared.
pub fn create_table(
    entity: &EntityType,
    properties: &IndexMap<String, PropertyConfiguration>,
    primary_keys: &[String],
) -> Result<TableDef, BuilderError> {
    if primary_keys.is_empty() {
        return Err(BuilderError::MissingPrimaryKey {
            entity: entity.name().to_string(),
            table: entity.table_name().to_string(),
        });
    }

    let mut columns = Vec::new();
    for field in entity.fields() {
        let class = classify_field(entity, field)?;
        let is_primary = primary_keys.contains(&field.name);

        let (scalar, optional) = match class {
            FieldClass::Scalar { scalar, optional } => (scalar, optional),
            _ if is_primary => {
                return Err(BuilderError::KeyNotColumn {
                    entity: entity.name().to_string(),
                    field: field.name.clone(),
                    ty: field.ty.to_string(),
                });
            }
            _ => continue,
        };

        let prop = properties.get(&field.name);
        let required = prop.is_some_and(|p| p.is_required());

        let mut ty = column_type(&scalar);
        if let Some(length) = prop.and_then(|p| p.max_length()) {
            if !scalar.is_text() {
                return Err(BuilderError::MaxLenOnNonText {
                    entity: entity.name().to_string(),
                    field: field.name.clone(),
                    ty: field.ty.to_string(),
                });
            }
            ty = ColumnType::Complex(ComplexColumnType::Varchar { length });
        }

        let auto_increment = prop.is_some_and(|p| p.is_autoincrement());
        if auto_increment && !field.ty.is_optional_integer() {
            return Err(BuilderError::AutoincrementType {
                entity: entity.name().to_string(),
                field: field.name.clone(),
                ty: field.ty.to_string(),
            });
        }
        // Keys accumulate across `has_key` calls, so the single-column rule
        // is checked again against the final key.
        if auto_increment && is_primary && primary_keys.len() > 1 {
            return Err(BuilderError::CompositeAutoincrement {
                entity: entity.name().to_string(),
                fields: format!("({})", primary_keys.join(", ")),
            });
        }

        let mut column = ColumnDef::new(field.name.clone(), ty);
        column.primary_key = is_primary;
        column.nullable = optional && !is_primary && !required;
        column.auto_increment = auto_increment;
        if let Some(prop) = prop {
            column.unique = prop.is_unique();
            column.default = prop.default_value().cloned();
            column.server_default = prop.server_default().map(str::to_string);
        }
        columns.push(column);
    }

    // Keys naming undeclared fields are rejected by `has_key`; this covers
    // key lists assembled by hand.
    for key in primary_keys {
        if !columns.iter().any(|c| &c.name == key) {
            entity.require_field(key)?;
        }
    }

    Ok(TableDef::new(
        entity.table_name(),
        Some(entity.name().to_string()),
        columns,
    ))
}
