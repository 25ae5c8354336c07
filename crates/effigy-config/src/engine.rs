use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Keyword options handed to the database engine, keyed by option name.
pub type EngineOpts = BTreeMap<String, JsonValue>;

pub const CONNECT_ARGS: &str = "connect_args";

/// Engine options shared by every provider.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineOptions {
    pub echo: bool,
    pub echo_pool: bool,
    pub pool_size: Option<u32>,
    pub max_overflow: Option<u32>,
    /// Seconds to wait for a pooled connection.
    pub pool_timeout: Option<u64>,
    /// Seconds after which a pooled connection is recycled.
    pub pool_recycle: Option<u64>,
    pub pool_pre_ping: bool,
    pub isolation_level: Option<String>,
    pub connect_args: BTreeMap<String, JsonValue>,
}

impl EngineOptions {
    /// Render as an option map. Unset pool settings are omitted so the
    /// engine's own defaults apply.
    pub fn to_engine_opts(&self) -> EngineOpts {
        let mut opts = EngineOpts::new();
        opts.insert("echo".into(), self.echo.into());
        opts.insert("echo_pool".into(), self.echo_pool.into());
        self.pool_opts_into(&mut opts);
        if let Some(level) = &self.isolation_level {
            opts.insert("isolation_level".into(), level.clone().into());
        }
        if !self.connect_args.is_empty() {
            opts.insert(CONNECT_ARGS.into(), connect_args_value(&self.connect_args));
        }
        opts
    }

    /// Options without any pool sizing, for single-connection pools.
    pub fn to_static_pool_opts(&self) -> EngineOpts {
        let mut opts = self.to_engine_opts();
        for key in [
            "pool_size",
            "max_overflow",
            "pool_timeout",
            "pool_recycle",
            "pool_pre_ping",
        ] {
            opts.remove(key);
        }
        opts
    }

    fn pool_opts_into(&self, opts: &mut EngineOpts) {
        if let Some(size) = self.pool_size {
            opts.insert("pool_size".into(), size.into());
        }
        if let Some(overflow) = self.max_overflow {
            opts.insert("max_overflow".into(), overflow.into());
        }
        if let Some(timeout) = self.pool_timeout {
            opts.insert("pool_timeout".into(), timeout.into());
        }
        if let Some(recycle) = self.pool_recycle {
            opts.insert("pool_recycle".into(), recycle.into());
        }
        if self.pool_pre_ping {
            opts.insert("pool_pre_ping".into(), true.into());
        }
    }
}

fn connect_args_value(args: &BTreeMap<String, JsonValue>) -> JsonValue {
    JsonValue::Object(args.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
}

/// Overlay `overrides` onto `base`. `connect_args` objects are merged key by
/// key; every other option is replaced.
pub fn merge_engine_opts(base: &mut EngineOpts, overrides: &EngineOpts) {
    for (key, value) in overrides {
        match (base.get_mut(key), value) {
            (Some(JsonValue::Object(existing)), JsonValue::Object(extra))
                if key == CONNECT_ARGS =>
            {
                for (k, v) in extra {
                    existing.insert(k.clone(), v.clone());
                }
            }
            _ => {
                base.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Settings for the SQLite in-memory provider.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InMemoryConfig {
    pub use_async: bool,
}

/// PostgreSQL driver settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PostgresConfig {
    pub server_side_cursors: bool,
    pub use_native_unicode: bool,
    pub client_encoding: String,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            server_side_cursors: false,
            use_native_unicode: true,
            client_encoding: "utf-8".to_string(),
        }
    }
}

/// MySQL driver settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MySqlConfig {
    pub charset: String,
    pub use_unicode: bool,
}

impl Default for MySqlConfig {
    fn default() -> Self {
        Self {
            charset: "utf8mb4".to_string(),
            use_unicode: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_options_only_carry_echo_flags() {
        let opts = EngineOptions::default().to_engine_opts();
        assert_eq!(opts.len(), 2);
        assert_eq!(opts["echo"], json!(false));
        assert_eq!(opts["echo_pool"], json!(false));
    }

    #[test]
    fn pool_settings_are_rendered_when_set() {
        let options = EngineOptions {
            pool_size: Some(5),
            max_overflow: Some(10),
            pool_pre_ping: true,
            isolation_level: Some("SERIALIZABLE".into()),
            ..Default::default()
        };
        let opts = options.to_engine_opts();
        assert_eq!(opts["pool_size"], json!(5));
        assert_eq!(opts["max_overflow"], json!(10));
        assert_eq!(opts["pool_pre_ping"], json!(true));
        assert_eq!(opts["isolation_level"], json!("SERIALIZABLE"));
        assert!(!opts.contains_key("pool_timeout"));

        let static_opts = options.to_static_pool_opts();
        assert!(!static_opts.contains_key("pool_size"));
        assert!(!static_opts.contains_key("pool_pre_ping"));
        assert_eq!(static_opts["isolation_level"], json!("SERIALIZABLE"));
    }

    #[test]
    fn merge_overlays_and_joins_connect_args() {
        let mut base = EngineOpts::new();
        base.insert("echo".into(), json!(false));
        base.insert(CONNECT_ARGS.into(), json!({"check_same_thread": false}));

        let mut overrides = EngineOpts::new();
        overrides.insert("echo".into(), json!(true));
        overrides.insert(CONNECT_ARGS.into(), json!({"timeout": 30}));

        merge_engine_opts(&mut base, &overrides);
        assert_eq!(base["echo"], json!(true));
        assert_eq!(
            base[CONNECT_ARGS],
            json!({"check_same_thread": false, "timeout": 30})
        );
    }

    #[test]
    fn camel_case_keys_deserialize() {
        let raw = r#"{"echoPool": true, "poolRecycle": 3600, "connectArgs": {"sslmode": "require"}}"#;
        let options: EngineOptions = serde_json::from_str(raw).unwrap();
        assert!(options.echo_pool);
        assert_eq!(options.pool_recycle, Some(3600));
        assert_eq!(options.connect_args["sslmode"], json!("require"));
    }

    #[test]
    fn driver_defaults() {
        let pg = PostgresConfig::default();
        assert!(pg.use_native_unicode);
        assert_eq!(pg.client_encoding, "utf-8");
        let mysql = MySqlConfig::default();
        assert_eq!(mysql.charset, "utf8mb4");
        assert!(mysql.use_unicode);
    }
}
