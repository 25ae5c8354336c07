pub mod drop;
pub mod init;
pub mod inspect;
pub mod sql;

pub use drop::cmd_drop;
pub use init::cmd_init;
pub use inspect::cmd_inspect;
pub use sql::cmd_sql;
