use sea_query::{Alias, Expr, Order, Query, SelectStatement, SimpleExpr};

use effigy_core::{TableDef, Value};

use super::helpers::value_expr;
use super::types::BuiltQuery;
use crate::error::QueryError;

#[derive(Debug, Clone, PartialEq)]
pub enum FilterOp {
    Eq(Value),
    Ne(Value),
    Lt(Value),
    Le(Value),
    Gt(Value),
    Ge(Value),
    Like(String),
    In(Vec<Value>),
    IsNull,
    IsNotNull,
}

/// A single column predicate. Predicates on one query are combined with AND.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub op: FilterOp,
}

impl Filter {
    pub fn new(column: impl Into<String>, op: FilterOp) -> Self {
        Self {
            column: column.into(),
            op,
        }
    }

    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, FilterOp::Eq(value.into()))
    }

    pub fn to_expr(&self) -> SimpleExpr {
        let col = Expr::col(Alias::new(&self.column));
        match &self.op {
            // `= NULL` never matches; compare with IS NULL instead
            FilterOp::Eq(Value::Null) => col.is_null(),
            FilterOp::Ne(Value::Null) => col.is_not_null(),
            FilterOp::Eq(v) => col.eq(value_expr(v)),
            FilterOp::Ne(v) => col.ne(value_expr(v)),
            FilterOp::Lt(v) => col.lt(value_expr(v)),
            FilterOp::Le(v) => col.lte(value_expr(v)),
            FilterOp::Gt(v) => col.gt(value_expr(v)),
            FilterOp::Ge(v) => col.gte(value_expr(v)),
            FilterOp::Like(pattern) => col.like(pattern.as_str()),
            FilterOp::In(values) => col.is_in(values.iter().map(value_expr)),
            FilterOp::IsNull => col.is_null(),
            FilterOp::IsNotNull => col.is_not_null(),
        }
    }
}

/// Fails when `column` is not a column of `table`.
pub fn check_column(table: &TableDef, column: &str) -> Result<(), QueryError> {
    if table.has_column(column) {
        return Ok(());
    }
    Err(QueryError::UnknownColumn {
        table: table.name.clone(),
        column: column.to_string(),
        available: table.column_names().collect::<Vec<_>>().join(", "),
    })
}

/// SELECT over one table's columns with filtering, ordering and paging.
#[derive(Debug, Clone)]
pub struct SelectQuery {
    table: TableDef,
    filters: Vec<Filter>,
    order: Vec<(String, Order)>,
    offset: Option<u64>,
    limit: Option<u64>,
    distinct: bool,
}

impl SelectQuery {
    pub fn new(table: TableDef) -> Self {
        Self {
            table,
            filters: Vec::new(),
            order: Vec::new(),
            offset: None,
            limit: None,
            distinct: false,
        }
    }

    pub fn table(&self) -> &TableDef {
        &self.table
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn filter(mut self, filter: Filter) -> Result<Self, QueryError> {
        check_column(&self.table, &filter.column)?;
        self.filters.push(filter);
        Ok(self)
    }

    pub fn order_by(mut self, column: &str, descending: bool) -> Result<Self, QueryError> {
        check_column(&self.table, column)?;
        let order = if descending { Order::Desc } else { Order::Asc };
        self.order.push((column.to_string(), order));
        Ok(self)
    }

    pub fn skip(mut self, count: u64) -> Self {
        self.offset = Some(count);
        self
    }

    pub fn take(mut self, count: u64) -> Self {
        self.limit = Some(count);
        self
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn statement(&self) -> SelectStatement {
        let mut stmt = Query::select();
        stmt.columns(self.table.column_names().map(Alias::new))
            .from(Alias::new(&self.table.name));
        if self.distinct {
            stmt.distinct();
        }
        for filter in &self.filters {
            stmt.and_where(filter.to_expr());
        }
        for (column, order) in &self.order {
            stmt.order_by(Alias::new(column), order.clone());
        }
        if let Some(limit) = self.limit {
            stmt.limit(limit);
        }
        if let Some(offset) = self.offset {
            stmt.offset(offset);
        }
        stmt
    }

    pub fn build(&self) -> BuiltQuery {
        BuiltQuery::Select(Box::new(self.statement()))
    }

    /// `SELECT COUNT(*)` over the query as a subquery, so paging and
    /// DISTINCT are honored.
    pub fn count(&self) -> BuiltQuery {
        let stmt = Query::select()
            .expr(Expr::cust("COUNT(*)"))
            .from_subquery(self.statement(), Alias::new("sub"))
            .to_owned();
        BuiltQuery::Select(Box::new(stmt))
    }

    /// `SELECT EXISTS(...)` over the query.
    pub fn exists(&self) -> BuiltQuery {
        let stmt = Query::select()
            .expr(Expr::exists(self.statement()))
            .to_owned();
        BuiltQuery::Select(Box::new(stmt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::types::DatabaseBackend;
    use effigy_core::{ColumnDef, ColumnType, SimpleColumnType};
    use insta::assert_snapshot;

    fn products() -> TableDef {
        TableDef::new(
            "products",
            Some("Product".into()),
            ["id", "name", "price"]
                .into_iter()
                .map(|c| ColumnDef::new(c, ColumnType::Simple(SimpleColumnType::Integer)))
                .collect(),
        )
    }

    #[test]
    fn test_plain_select() {
        let sql = SelectQuery::new(products())
            .build()
            .build(DatabaseBackend::Postgres);
        assert_snapshot!(sql, @r#"SELECT "id", "name", "price" FROM "products""#);
    }

    #[test]
    fn test_filter_order_and_paging() {
        let sql = SelectQuery::new(products())
            .filter(Filter::eq("name", "lamp"))
            .unwrap()
            .filter(Filter::new("price", FilterOp::Gt(Value::Integer(10))))
            .unwrap()
            .order_by("price", true)
            .unwrap()
            .skip(20)
            .take(10)
            .build()
            .build(DatabaseBackend::Sqlite);
        assert_snapshot!(sql, @r#"SELECT "id", "name", "price" FROM "products" WHERE "name" = 'lamp' AND "price" > 10 ORDER BY "price" DESC LIMIT 10 OFFSET 20"#);
    }

    #[test]
    fn test_null_comparisons_use_is_null() {
        let sql = SelectQuery::new(products())
            .filter(Filter::eq("name", Value::Null))
            .unwrap()
            .build()
            .build(DatabaseBackend::MySql);
        assert!(sql.ends_with("WHERE `name` IS NULL"), "got: {}", sql);
    }

    #[test]
    fn test_distinct() {
        let sql = SelectQuery::new(products())
            .distinct()
            .build()
            .build(DatabaseBackend::Postgres);
        assert!(sql.starts_with("SELECT DISTINCT \"id\""), "got: {}", sql);
    }

    #[test]
    fn test_count_wraps_subquery() {
        let sql = SelectQuery::new(products())
            .take(5)
            .count()
            .build(DatabaseBackend::Postgres);
        assert!(sql.starts_with("SELECT COUNT(*) FROM (SELECT"), "got: {}", sql);
        assert!(sql.ends_with("LIMIT 5) AS \"sub\""), "got: {}", sql);
    }

    #[test]
    fn test_exists() {
        let sql = SelectQuery::new(products())
            .filter(Filter::new("id", FilterOp::In(vec![1.into(), 2.into()])))
            .unwrap()
            .exists()
            .build(DatabaseBackend::Postgres);
        assert!(sql.starts_with("SELECT EXISTS"), "got: {}", sql);
        assert!(sql.contains("\"id\" IN (1, 2)"), "got: {}", sql);
    }

    #[test]
    fn test_unknown_column_rejected() {
        let err = SelectQuery::new(products())
            .order_by("weight", false)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "column 'weight' does not exist on table products. Available columns: id, name, price"
        );
    }
}
