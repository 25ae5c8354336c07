use std::fmt;

use serde::{Deserialize, Serialize};

use crate::schema::names::ColumnName;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ColumnDef {
    pub name: ColumnName,
    pub r#type: ColumnType,
    pub nullable: bool,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default)]
    pub auto_increment: bool,
    #[serde(default)]
    pub unique: bool,
    /// Client-side default, filled in when a record omits the column.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// SQL expression emitted as the column's `DEFAULT` clause.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_default: Option<String>,
}

impl ColumnDef {
    pub fn new(name: impl Into<ColumnName>, ty: ColumnType) -> Self {
        Self {
            name: name.into(),
            r#type: ty,
            nullable: false,
            primary_key: false,
            auto_increment: false,
            unique: false,
            default: None,
            server_default: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", untagged)]
pub enum ColumnType {
    Simple(SimpleColumnType),
    Complex(ComplexColumnType),
}

impl ColumnType {
    /// Returns true if this type supports auto_increment (integer types only)
    pub fn supports_auto_increment(&self) -> bool {
        match self {
            ColumnType::Simple(ty) => ty.supports_auto_increment(),
            ColumnType::Complex(_) => false,
        }
    }

    /// Text columns, bounded or not.
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            ColumnType::Simple(SimpleColumnType::Text)
                | ColumnType::Complex(ComplexColumnType::Varchar { .. })
        )
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Simple(ty) => write!(f, "{}", ty.sql_name()),
            ColumnType::Complex(ComplexColumnType::Varchar { length }) => {
                write!(f, "varchar({})", length)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimpleColumnType {
    Integer,
    Float,
    Boolean,

    // Text types
    Text,

    // Binary type
    Bytea,

    // Date/Time types
    Date,
    Timestamp,

    Uuid,
    Decimal,
    Json,
}

impl SimpleColumnType {
    /// Returns true if this type supports auto_increment (integer types only)
    pub fn supports_auto_increment(&self) -> bool {
        matches!(self, SimpleColumnType::Integer)
    }

    pub fn sql_name(&self) -> &'static str {
        match self {
            SimpleColumnType::Integer => "integer",
            SimpleColumnType::Float => "float",
            SimpleColumnType::Boolean => "boolean",
            SimpleColumnType::Text => "text",
            SimpleColumnType::Bytea => "bytea",
            SimpleColumnType::Date => "date",
            SimpleColumnType::Timestamp => "timestamp",
            SimpleColumnType::Uuid => "uuid",
            SimpleColumnType::Decimal => "decimal",
            SimpleColumnType::Json => "json",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ComplexColumnType {
    Varchar { length: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(SimpleColumnType::Integer, true)]
    #[case(SimpleColumnType::Float, false)]
    #[case(SimpleColumnType::Text, false)]
    #[case(SimpleColumnType::Boolean, false)]
    fn test_simple_column_type_supports_auto_increment(
        #[case] ty: SimpleColumnType,
        #[case] expected: bool,
    ) {
        assert_eq!(ColumnType::Simple(ty).supports_auto_increment(), expected);
    }

    #[test]
    fn test_varchar_does_not_support_auto_increment() {
        assert!(!ColumnType::Complex(ComplexColumnType::Varchar { length: 10 }).supports_auto_increment());
    }

    #[rstest]
    #[case(ColumnType::Simple(SimpleColumnType::Text), true)]
    #[case(ColumnType::Complex(ComplexColumnType::Varchar { length: 50 }), true)]
    #[case(ColumnType::Simple(SimpleColumnType::Json), false)]
    fn test_is_text(#[case] ty: ColumnType, #[case] expected: bool) {
        assert_eq!(ty.is_text(), expected);
    }

    #[rstest]
    #[case(ColumnType::Simple(SimpleColumnType::Integer), "integer")]
    #[case(ColumnType::Complex(ComplexColumnType::Varchar { length: 120 }), "varchar(120)")]
    fn test_display(#[case] ty: ColumnType, #[case] expected: &str) {
        assert_eq!(ty.to_string(), expected);
    }

    #[test]
    fn test_column_type_serde_shapes() {
        let simple = serde_json::to_string(&ColumnType::Simple(SimpleColumnType::Text)).unwrap();
        assert_eq!(simple, "\"text\"");
        let complex =
            serde_json::to_string(&ColumnType::Complex(ComplexColumnType::Varchar { length: 8 }))
                .unwrap();
        assert_eq!(complex, r#"{"kind":"varchar","length":8}"#);
    }
}
