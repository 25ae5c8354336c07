use serde::{Deserialize, Serialize};

use crate::schema::{
    column::ColumnDef, foreign_key::ForeignKeyDef, index::IndexDef, names::TableName,
};

/// A synthesized table: the column set bound to one entity, or an association
/// table joining two entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TableDef {
    pub name: TableName,
    /// Entity the table is bound to; `None` for association tables.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    pub columns: Vec<ColumnDef>,
    #[serde(default)]
    pub indexes: Vec<IndexDef>,
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKeyDef>,
}

impl TableDef {
    pub fn new(name: impl Into<TableName>, entity: Option<String>, columns: Vec<ColumnDef>) -> Self {
        Self {
            name: name.into(),
            entity,
            columns,
            indexes: Vec::new(),
            foreign_keys: Vec::new(),
        }
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn primary_key_columns(&self) -> impl Iterator<Item = &ColumnDef> {
        self.columns.iter().filter(|c| c.primary_key)
    }

    pub fn is_association(&self) -> bool {
        self.entity.is_none()
    }

    /// Adds a foreign key unless one over the same columns and target exists.
    /// Returns whether it was added.
    pub fn add_foreign_key(&mut self, fk: ForeignKeyDef) -> bool {
        let exists = self
            .foreign_keys
            .iter()
            .any(|f| f.columns == fk.columns && f.ref_table == fk.ref_table);
        if exists {
            return false;
        }
        self.foreign_keys.push(fk);
        true
    }
}
