use std::collections::HashMap;

use crate::data::Data;
use crate::descriptor::TypeDesc;

/// Metadata key overriding the unstructured name of a field.
pub const RENAME_KEY: &str = "rename";

/// A single field of a record or named tuple.
///
/// Position in the owning shape's field list is the positional index used
/// for sequence layouts.
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub name: String,
    pub ty: TypeDesc,
    /// Statically declared default. `None` → the field is required.
    pub default: Option<Data>,
    /// Arbitrary field-level properties. The engine only interprets `rename`.
    pub metadata: HashMap<String, serde_json::Value>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, ty: TypeDesc) -> Self {
        Self {
            name: name.into(),
            ty,
            default: None,
            metadata: HashMap::new(),
        }
    }

    pub fn with_default(mut self, default: impl Into<Data>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Shorthand for `with_metadata("rename", name)`.
    pub fn renamed(self, name: impl Into<String>) -> Self {
        self.with_metadata(RENAME_KEY, serde_json::Value::String(name.into()))
    }

    /// Explicit unstructured name from metadata, if any.
    pub fn rename(&self) -> Option<&str> {
        self.metadata.get(RENAME_KEY).and_then(serde_json::Value::as_str)
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}
