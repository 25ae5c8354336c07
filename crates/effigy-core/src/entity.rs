use std::sync::Arc;

use crate::error::EntityError;
use crate::field_type::FieldType;

/// A single declared field of an entity, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: String,
    pub ty: FieldType,
}

/// A user-declared record shape: entity name, table name and ordered field
/// annotations.
///
/// Entities are immutable once built and shared as `Arc<EntityType>`. All
/// builder-side state lives in the builder's configuration objects, never on
/// the entity itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityType {
    name: String,
    table_name: String,
    fields: Vec<FieldDecl>,
}

impl EntityType {
    pub fn builder(name: impl Into<String>) -> EntityTypeBuilder {
        EntityTypeBuilder {
            name: name.into(),
            table_name: None,
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn fields(&self) -> &[FieldDecl] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDecl> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Look up a declared field, failing with the list of available fields.
    pub fn require_field(&self, name: &str) -> Result<&FieldDecl, EntityError> {
        self.field(name).ok_or_else(|| EntityError::UnknownField {
            entity: self.name.clone(),
            field: name.to_string(),
            available: self.available_fields(),
        })
    }

    /// Comma separated field names, `(none)` for an entity without fields.
    pub fn available_fields(&self) -> String {
        if self.fields.is_empty() {
            "(none)".to_string()
        } else {
            self.field_names().collect::<Vec<_>>().join(", ")
        }
    }
}

pub struct EntityTypeBuilder {
    name: String,
    table_name: Option<String>,
    fields: Vec<FieldDecl>,
}

impl EntityTypeBuilder {
    /// Overrides the default table name (lower-cased, pluralized entity name).
    pub fn table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = Some(table_name.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, ty: impl Into<FieldType>) -> Self {
        self.fields.push(FieldDecl {
            name: name.into(),
            ty: ty.into(),
        });
        self
    }

    /// Declares a field from its textual annotation, e.g. `"int | None"`.
    pub fn annotated(self, name: impl Into<String>, annotation: &str) -> Result<Self, EntityError> {
        let name = name.into();
        let ty = annotation
            .parse::<FieldType>()
            .map_err(|source| EntityError::InvalidFieldType {
                entity: self.name.clone(),
                field: name.clone(),
                source,
            })?;
        Ok(self.field(name, ty))
    }

    pub fn build(self) -> Result<Arc<EntityType>, EntityError> {
        if self.name.trim().is_empty() {
            return Err(EntityError::EmptyName);
        }

        for (i, field) in self.fields.iter().enumerate() {
            if self.fields[..i].iter().any(|f| f.name == field.name) {
                return Err(EntityError::DuplicateField {
                    entity: self.name.clone(),
                    field: field.name.clone(),
                });
            }
        }

        let table_name = match self.table_name {
            Some(table) if table.trim().is_empty() => {
                return Err(EntityError::EmptyTableName(self.name));
            }
            Some(table) => table,
            None => effigy_naming::default_table_name(&self.name),
        };

        Ok(Arc::new(EntityType {
            name: self.name,
            table_name,
            fields: self.fields,
        }))
    }
}
