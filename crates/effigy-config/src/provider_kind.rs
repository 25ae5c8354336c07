use std::fmt;

use serde::{Deserialize, Serialize};

/// Which database provider a project targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    #[cfg_attr(feature = "cli", value(name = "inmemory"))]
    InMemory,
    Postgres,
    #[cfg_attr(feature = "cli", value(name = "mysql"))]
    MySql,
}

impl ProviderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderKind::InMemory => "inmemory",
            ProviderKind::Postgres => "postgres",
            ProviderKind::MySql => "mysql",
        }
    }

    /// Whether the provider needs a `databaseUrl` to connect.
    pub fn requires_url(self) -> bool {
        !matches!(self, ProviderKind::InMemory)
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
