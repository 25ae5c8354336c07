use effigy_core::{IndexDef, TableDef};
use effigy_naming::build_index_name;

use crate::error::BuilderError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfiguration {
    fields: Vec<String>,
    unique: bool,
    name: Option<String>,
}

impl IndexConfiguration {
    pub fn new(fields: Vec<String>, unique: bool, name: Option<String>) -> Self {
        Self {
            fields,
            unique,
            name,
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn is_unique(&self) -> bool {
        self.unique
    }

    /// Explicit name if one was given, else `{ix|uq}_{table}_{fields}`.
    pub fn index_name(&self, table_name: &str) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => build_index_name(table_name, &self.fields, self.unique),
        }
    }

    pub fn create_index(&self, table: &TableDef, table_name: &str) -> Result<IndexDef, BuilderError> {
        let entity = table.entity.clone().unwrap_or_else(|| table_name.to_string());
        if self.fields.is_empty() {
            return Err(BuilderError::EmptyIndex { entity });
        }

        let name = self.index_name(table_name);
        for field in &self.fields {
            if !table.has_column(field) {
                return Err(BuilderError::IndexColumnNotFound {
                    entity,
                    index: name,
                    field: field.clone(),
                    available: table.column_names().collect::<Vec<_>>().join(", "),
                });
            }
        }

        Ok(IndexDef::new(name, self.fields.clone(), self.unique))
    }
}
