use heck::{ToKebabCase, ToLowerCamelCase};
use serde::Deserialize;
use strata_api::FieldDef;

use crate::error::EngineError;

/// Engine configuration, parsed from TOML.
///
/// ```toml
/// [dispatch]
/// delegation = "lookup_order"
///
/// [records]
/// layout = "sequence"
/// unknown_fields = "reject"
/// fill_defaults = true
/// omit_defaults = "when_equal"
/// naming = "camel_case"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    #[serde(default)]
    pub dispatch: DispatchConfig,

    #[serde(default)]
    pub records: RecordOptions,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchConfig {
    #[serde(default)]
    pub delegation: Delegation,
}

/// What a deferring handler gets when it delegates past the end of its chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Delegation {
    /// A lookup failure. Every chain must end in a terminal handler.
    #[default]
    Chain,
    /// The chain of the next descriptor in the lookup order that has one.
    LookupOrder,
}

/// Unstructured form of records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordLayout {
    /// A mapping keyed by field name.
    #[default]
    Mapping,
    /// A sequence in field declaration order.
    Sequence,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownFields {
    #[default]
    Ignore,
    Reject,
}

/// Which fields are dropped from unstructured records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OmitDefaults {
    #[default]
    Never,
    /// Fields whose value equals the declared default.
    WhenEqual,
}

/// Naming convention of unstructured field names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldNaming {
    #[default]
    AsIs,
    CamelCase,
    KebabCase,
}

impl FieldNaming {
    pub fn apply(self, name: &str) -> String {
        match self {
            FieldNaming::AsIs => name.to_string(),
            FieldNaming::CamelCase => name.to_lower_camel_case(),
            FieldNaming::KebabCase => name.to_kebab_case(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordOptions {
    #[serde(default)]
    pub layout: RecordLayout,

    #[serde(default)]
    pub unknown_fields: UnknownFields,

    /// Use declared defaults for fields absent from the input.
    #[serde(default = "default_fill_defaults")]
    pub fill_defaults: bool,

    #[serde(default)]
    pub omit_defaults: OmitDefaults,

    #[serde(default)]
    pub naming: FieldNaming,
}

fn default_fill_defaults() -> bool {
    true
}

impl Default for RecordOptions {
    fn default() -> Self {
        Self {
            layout: RecordLayout::default(),
            unknown_fields: UnknownFields::default(),
            fill_defaults: default_fill_defaults(),
            omit_defaults: OmitDefaults::default(),
            naming: FieldNaming::default(),
        }
    }
}

impl RecordOptions {
    /// Key of `field` in the unstructured form: metadata `rename` wins over `naming`.
    pub fn external_name(&self, field: &FieldDef) -> String {
        match field.rename() {
            Some(name) => name.to_string(),
            None => self.naming.apply(&field.name),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self, EngineError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| EngineError::Config(format!("{path}: {e}")))?;
        Self::parse(&content).map_err(|e| e.with_context(path))
    }

    /// Parse configuration from a TOML string.
    pub fn parse(toml_str: &str) -> Result<Self, EngineError> {
        toml::from_str(toml_str).map_err(|e| EngineError::Config(e.to_string()))
    }
}
