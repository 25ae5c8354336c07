use effigy_naming::build_foreign_key_name;
use serde::{Deserialize, Serialize};

use crate::schema::names::{ColumnName, TableName};

/// `columns` of the owning table reference `ref_columns` of `ref_table`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ForeignKeyDef {
    pub name: String,
    pub columns: Vec<ColumnName>,
    pub ref_table: TableName,
    pub ref_columns: Vec<ColumnName>,
}

impl ForeignKeyDef {
    /// Single-column reference named `fk_{table}_{column}`.
    pub fn single(table: &str, column: &str, ref_table: &str, ref_column: &str) -> Self {
        let columns = vec![column.to_string()];
        Self {
            name: build_foreign_key_name(table, &columns),
            columns,
            ref_table: ref_table.to_string(),
            ref_columns: vec![ref_column.to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_column_reference_is_named_after_owner() {
        let fk = ForeignKeyDef::single("posts", "user_id", "users", "id");
        assert_eq!(fk.name, "fk_posts_user_id");
        assert_eq!(fk.columns, vec!["user_id"]);
        assert_eq!(fk.ref_table, "users");
        assert_eq!(fk.ref_columns, vec!["id"]);
    }
}
