pub mod column;
pub mod foreign_key;
pub mod index;
pub mod metadata;
pub mod names;
pub mod table;

pub use column::{ColumnDef, ColumnType, ComplexColumnType, SimpleColumnType};
pub use foreign_key::ForeignKeyDef;
pub use index::IndexDef;
pub use metadata::MetaData;
pub use names::{ColumnName, IndexName, TableName};
pub use table::TableDef;
