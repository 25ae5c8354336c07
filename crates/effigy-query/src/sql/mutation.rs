use sea_query::{Alias, Query};

use effigy_core::{TableDef, Value};

use super::helpers::value_expr;
use super::select::{Filter, check_column};
use super::types::BuiltQuery;
use crate::error::QueryError;

/// INSERT of a single row. An empty row inserts the table defaults.
pub fn build_insert(table: &TableDef, row: &[(String, Value)]) -> Result<BuiltQuery, QueryError> {
    for (column, _) in row {
        check_column(table, column)?;
    }

    let mut stmt = Query::insert();
    stmt.into_table(Alias::new(&table.name));
    if row.is_empty() {
        stmt.or_default_values();
    } else {
        stmt.columns(row.iter().map(|(column, _)| Alias::new(column)));
        stmt.values(row.iter().map(|(_, value)| value_expr(value)))
            .map_err(|e| QueryError::Other(e.to_string()))?;
    }
    Ok(BuiltQuery::Insert(Box::new(stmt)))
}

pub fn build_update(
    table: &TableDef,
    assignments: &[(String, Value)],
    filters: &[Filter],
) -> Result<BuiltQuery, QueryError> {
    if assignments.is_empty() {
        return Err(QueryError::Other(format!(
            "update of table {} must assign at least one column",
            table.name
        )));
    }
    for (column, _) in assignments {
        check_column(table, column)?;
    }
    for filter in filters {
        check_column(table, &filter.column)?;
    }

    let mut stmt = Query::update();
    stmt.table(Alias::new(&table.name)).values(
        assignments
            .iter()
            .map(|(column, value)| (Alias::new(column), value_expr(value))),
    );
    for filter in filters {
        stmt.and_where(filter.to_expr());
    }
    Ok(BuiltQuery::Update(Box::new(stmt)))
}

pub fn build_delete(table: &TableDef, filters: &[Filter]) -> Result<BuiltQuery, QueryError> {
    for filter in filters {
        check_column(table, &filter.column)?;
    }

    let mut stmt = Query::delete();
    stmt.from_table(Alias::new(&table.name));
    for filter in filters {
        stmt.and_where(filter.to_expr());
    }
    Ok(BuiltQuery::Delete(Box::new(stmt)))
}
