use std::fmt;
use std::sync::Arc;

use effigy_core::{Validator, Value};

/// Per-field overrides applied when the field's column is synthesized.
///
/// Every setter returns `&mut Self` so overrides chain:
/// `entity.property("title")?.required().max_len(120)`.
#[derive(Clone)]
pub struct PropertyConfiguration {
    field: String,
    required: bool,
    unique: bool,
    max_len: Option<u32>,
    validators: Vec<Validator>,
    default: Option<Value>,
    server_default: Option<String>,
    autoincrement: bool,
}

impl PropertyConfiguration {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            required: false,
            unique: false,
            max_len: None,
            validators: Vec::new(),
            default: None,
            server_default: None,
            autoincrement: false,
        }
    }

    pub fn required(&mut self) -> &mut Self {
        self.required = true;
        self
    }

    pub fn unique(&mut self) -> &mut Self {
        self.unique = true;
        self
    }

    /// Bounds a text column's length. Rejected at table synthesis for non-text fields.
    pub fn max_len(&mut self, max_len: u32) -> &mut Self {
        self.max_len = Some(max_len);
        self
    }

    pub fn validate_with<F>(&mut self, validator: F) -> &mut Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.validators.push(Arc::new(validator));
        self
    }

    pub fn with_default(&mut self, default: impl Into<Value>) -> &mut Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_server_default(&mut self, server_default: impl Into<String>) -> &mut Self {
        self.server_default = Some(server_default.into());
        self
    }

    pub fn autoincrement(&mut self) -> &mut Self {
        self.autoincrement = true;
        self
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_unique(&self) -> bool {
        self.unique
    }

    pub fn max_length(&self) -> Option<u32> {
        self.max_len
    }

    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn server_default(&self) -> Option<&str> {
        self.server_default.as_deref()
    }

    pub fn is_autoincrement(&self) -> bool {
        self.autoincrement
    }
}

impl fmt::Debug for PropertyConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyConfiguration")
            .field("field", &self.field)
            .field("required", &self.required)
            .field("unique", &self.unique)
            .field("max_len", &self.max_len)
            .field("validators", &self.validators.len())
            .field("default", &self.default)
            .field("server_default", &self.server_default)
            .field("autoincrement", &self.autoincrement)
            .finish()
    }
}
