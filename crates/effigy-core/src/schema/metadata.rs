use std::collections::VecDeque;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::schema::table::TableDef;

/// Registry of every table synthesized for one schema, in creation order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaData {
    tables: IndexMap<String, TableDef>,
}

impl MetaData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a table. Every table name is registered exactly once.
    pub fn add_table(&mut self, table: TableDef) -> Result<&TableDef, SchemaError> {
        if self.tables.contains_key(&table.name) {
            return Err(SchemaError::TableExists(table.name));
        }
        let name = table.name.clone();
        let (index, _) = self.tables.insert_full(name, table);
        Ok(&self.tables[index])
    }

    pub fn contains_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    pub fn table(&self, name: &str) -> Option<&TableDef> {
        self.tables.get(name)
    }

    pub fn table_mut(&mut self, name: &str) -> Option<&mut TableDef> {
        self.tables.get_mut(name)
    }

    pub fn require_table(&self, name: &str) -> Result<&TableDef, SchemaError> {
        self.table(name)
            .ok_or_else(|| SchemaError::TableNotFound(name.to_string()))
    }

    pub fn require_table_mut(&mut self, name: &str) -> Result<&mut TableDef, SchemaError> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| SchemaError::TableNotFound(name.to_string()))
    }

    pub fn tables(&self) -> impl Iterator<Item = &TableDef> {
        self.tables.values()
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Tables ordered so that every table comes after the tables its foreign
    /// keys reference. Ties keep registration order; self references are ignored.
    pub fn sorted_tables(&self) -> Result<Vec<&TableDef>, SchemaError> {
        // For each table, the set of other registered tables it depends on
        let mut dependencies: IndexMap<&str, IndexSet<&str>> = IndexMap::new();
        for table in self.tables.values() {
            let deps: IndexSet<&str> = table
                .foreign_keys
                .iter()
                .map(|fk| fk.ref_table.as_str())
                .filter(|r| *r != table.name && self.tables.contains_key(*r))
                .collect();
            dependencies.insert(table.name.as_str(), deps);
        }

        // Kahn's algorithm
        let mut in_degree: IndexMap<&str, usize> = dependencies
            .iter()
            .map(|(name, deps)| (*name, deps.len()))
            .collect();

        let mut queue: VecDeque<&str> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(name, _)| *name)
            .collect();

        let mut result: Vec<&TableDef> = Vec::with_capacity(self.tables.len());
        while let Some(name) = queue.pop_front() {
            if let Some(table) = self.tables.get(name) {
                result.push(table);
            }
            for (dependent, deps) in &dependencies {
                if deps.contains(name)
                    && let Some(degree) = in_degree.get_mut(dependent)
                {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(dependent);
                    }
                }
            }
        }

        if result.len() != self.tables.len() {
            let remaining = self
                .tables
                .keys()
                .filter(|name| !result.iter().any(|t| &t.name == *name))
                .cloned()
                .collect();
            return Err(SchemaError::CircularDependency(remaining));
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::column::{ColumnDef, ColumnType, SimpleColumnType};
    use crate::schema::foreign_key::ForeignKeyDef;

    fn table(name: &str, refs: &[&str]) -> TableDef {
        let mut table = TableDef::new(
            name,
            Some(name.to_string()),
            vec![ColumnDef::new("id", ColumnType::Simple(SimpleColumnType::Integer))],
        );
        for r in refs {
            table.foreign_keys.push(ForeignKeyDef {
                name: format!("fk_{}_{}_id", name, r),
                columns: vec![format!("{}_id", r)],
                ref_table: r.to_string(),
                ref_columns: vec!["id".into()],
            });
        }
        table
    }

    fn names<'a>(tables: &[&'a TableDef]) -> Vec<&'a str> {
        tables.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn add_table_rejects_duplicates() {
        let mut metadata = MetaData::new();
        metadata.add_table(table("users", &[])).unwrap();
        let err = metadata.add_table(table("users", &[])).unwrap_err();
        assert_eq!(err, SchemaError::TableExists("users".into()));
        assert_eq!(metadata.len(), 1);
    }

    #[test]
    fn require_table_reports_missing() {
        let metadata = MetaData::new();
        assert_eq!(
            metadata.require_table("users").unwrap_err(),
            SchemaError::TableNotFound("users".into())
        );
    }

    #[test]
    fn sorted_tables_puts_referenced_tables_first() {
        let mut metadata = MetaData::new();
        metadata.add_table(table("posts_tags", &["posts", "tags"])).unwrap();
        metadata.add_table(table("posts", &["users"])).unwrap();
        metadata.add_table(table("tags", &[])).unwrap();
        metadata.add_table(table("users", &[])).unwrap();

        let sorted = metadata.sorted_tables().unwrap();
        assert_eq!(names(&sorted), vec!["tags", "users", "posts", "posts_tags"]);
    }

    #[test]
    fn sorted_tables_ignores_self_references() {
        let mut metadata = MetaData::new();
        metadata.add_table(table("categories", &["categories"])).unwrap();
        let sorted = metadata.sorted_tables().unwrap();
        assert_eq!(names(&sorted), vec!["categories"]);
    }

    #[test]
    fn sorted_tables_detects_cycles() {
        let mut metadata = MetaData::new();
        metadata.add_table(table("a", &["b"])).unwrap();
        metadata.add_table(table("b", &["a"])).unwrap();
        metadata.add_table(table("c", &[])).unwrap();
        let err = metadata.sorted_tables().unwrap_err();
        assert_eq!(err, SchemaError::CircularDependency(vec!["a".into(), "b".into()]));
    }
}
