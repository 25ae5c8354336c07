use effigy_config::{CONNECT_ARGS, EngineOptions, EngineOpts, InMemoryConfig};
use effigy_query::DatabaseBackend;
use serde_json::{Value as JsonValue, json};

use super::DatabaseProvider;

/// SQLite database held in memory for the lifetime of a single connection.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    options: EngineOptions,
    use_async: bool,
}

impl InMemoryProvider {
    pub fn new(options: EngineOptions, config: &InMemoryConfig) -> Self {
        Self {
            options,
            use_async: config.use_async,
        }
    }

    pub fn with_async(mut self, use_async: bool) -> Self {
        self.use_async = use_async;
        self
    }
}

impl DatabaseProvider for InMemoryProvider {
    fn connection_string(&self) -> String {
        if self.use_async {
            "sqlite+aiosqlite:///:memory:".to_string()
        } else {
            "sqlite:///:memory:".to_string()
        }
    }

    // A static pool rejects pool sizing options.
    fn engine_options(&self) -> EngineOpts {
        let mut opts = self.options.to_static_pool_opts();
        opts.insert("poolclass".into(), json!("StaticPool"));
        if !self.use_async {
            // the connection is shared across threads
            let connect_args = opts
                .entry(CONNECT_ARGS.to_string())
                .or_insert_with(|| JsonValue::Object(Default::default()));
            if let JsonValue::Object(args) = connect_args {
                args.insert("check_same_thread".into(), JsonValue::Bool(false));
            }
        }
        opts
    }

    fn backend(&self) -> DatabaseBackend {
        DatabaseBackend::Sqlite
    }
}
