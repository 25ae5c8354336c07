use serde::{Deserialize, Serialize};

use crate::schema::names::{ColumnName, IndexName};

/// A named index over one or more columns of a synthesized table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct IndexDef {
    pub name: IndexName,
    pub columns: Vec<ColumnName>,
    #[serde(default)]
    pub unique: bool,
}

impl IndexDef {
    pub fn new(name: impl Into<IndexName>, columns: Vec<ColumnName>, unique: bool) -> Self {
        Self {
            name: name.into(),
            columns,
            unique,
        }
    }
}
