use effigy_core::{Mapper, TableDef, Value};
use effigy_query::{
    DatabaseBackend, Filter, SelectQuery, build_delete, build_insert, build_update,
};
use indexmap::IndexMap;

use crate::error::EffigyError;

/// Field values of one entity instance, keyed by field name.
pub type Record = IndexMap<String, Value>;

/// Queries and mutations over the rows of one mapped entity.
///
/// Query methods consume and return the set so calls chain; each returns
/// an error if it names a column the entity's table lacks.
#[derive(Debug, Clone)]
pub struct DbSet<'a> {
    backend: DatabaseBackend,
    mapper: &'a Mapper,
    query: SelectQuery,
}

impl<'a> DbSet<'a> {
    pub(crate) fn new(backend: DatabaseBackend, mapper: &'a Mapper, table: &TableDef) -> Self {
        Self {
            backend,
            mapper,
            query: SelectQuery::new(table.clone()),
        }
    }

    pub fn entity(&self) -> &str {
        self.mapper.entity().name()
    }

    pub fn table(&self) -> &TableDef {
        self.query.table()
    }

    /// The same set with its filters, ordering and paging cleared.
    pub fn query(&self) -> Self {
        Self {
            backend: self.backend,
            mapper: self.mapper,
            query: SelectQuery::new(self.table().clone()),
        }
    }

    pub fn filter(self, filter: Filter) -> Result<Self, EffigyError> {
        let query = self.query.filter(filter)?;
        Ok(Self { query, ..self })
    }

    /// Shorthand for an equality filter.
    pub fn where_eq(self, column: &str, value: impl Into<Value>) -> Result<Self, EffigyError> {
        self.filter(Filter::eq(column, value))
    }

    pub fn order_by(self, column: &str, descending: bool) -> Result<Self, EffigyError> {
        let query = self.query.order_by(column, descending)?;
        Ok(Self { query, ..self })
    }

    pub fn skip(self, count: u64) -> Self {
        Self {
            query: self.query.skip(count),
            ..self
        }
    }

    pub fn take(self, count: u64) -> Self {
        Self {
            query: self.query.take(count),
            ..self
        }
    }

    pub fn distinct(self) -> Self {
        Self {
            query: self.query.distinct(),
            ..self
        }
    }

    pub fn to_sql(&self) -> String {
        self.query.build().build(self.backend)
    }

    pub fn count_sql(&self) -> String {
        self.query.count().build(self.backend)
    }

    pub fn any_sql(&self) -> String {
        self.query.exists().build(self.backend)
    }

    /// INSERT for one record after validating it against the mapping.
    ///
    /// Missing fields, and nulls given for NOT NULL columns, take their
    /// client-side default. A missing field with no default fails unless the
    /// column is nullable, autoincremented or filled by the server.
    pub fn insert_sql(&self, record: &Record) -> Result<String, EffigyError> {
        let table = self.table();
        for (field, value) in record {
            let Some(column) = table.column(field) else {
                return Err(self.unknown_field(field));
            };
            if value.is_null() && !column.nullable {
                continue;
            }
            self.check_value(field, value)?;
        }

        let mut row: Vec<(String, Value)> = Vec::with_capacity(table.columns.len());
        for column in &table.columns {
            // An explicit null on a NOT NULL column counts as missing
            let given = record
                .get(&column.name)
                .filter(|value| column.nullable || !value.is_null());
            match given {
                Some(value) => row.push((column.name.clone(), value.clone())),
                None => match &column.default {
                    Some(default) => row.push((column.name.clone(), default.clone())),
                    None if column.nullable
                        || column.auto_increment
                        || column.server_default.is_some() => {}
                    None => {
                        return Err(EffigyError::MissingValue {
                            entity: self.entity().to_string(),
                            field: column.name.clone(),
                        });
                    }
                },
            }
        }

        tracing::debug!(entity = %self.entity(), columns = row.len(), "insert");
        Ok(build_insert(table, &row)?.build(self.backend))
    }

    /// UPDATE of the rows matched by this set's filters.
    pub fn update_sql(&self, changes: &Record) -> Result<String, EffigyError> {
        let table = self.table();
        for (field, value) in changes {
            if !table.has_column(field) {
                return Err(self.unknown_field(field));
            }
            self.check_value(field, value)?;
        }
        let assignments: Vec<(String, Value)> = changes
            .iter()
            .map(|(field, value)| (field.clone(), value.clone()))
            .collect();
        Ok(build_update(table, &assignments, self.query.filters())?.build(self.backend))
    }

    /// DELETE of the rows matched by this set's filters.
    pub fn delete_sql(&self) -> Result<String, EffigyError> {
        Ok(build_delete(self.table(), self.query.filters())?.build(self.backend))
    }

    fn check_value(&self, field: &str, value: &Value) -> Result<(), EffigyError> {
        if self.mapper.validate(field, value) {
            return Ok(());
        }
        Err(EffigyError::ValidationFailed {
            entity: self.entity().to_string(),
            field: field.to_string(),
            value: value.to_string(),
        })
    }

    fn unknown_field(&self, field: &str) -> EffigyError {
        EffigyError::UnknownField {
            entity: self.entity().to_string(),
            field: field.to_string(),
            available: self.table().column_names().collect::<Vec<_>>().join(", "),
        }
    }
}
