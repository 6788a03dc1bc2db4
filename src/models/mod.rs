//! Wire models for management entities
//!
//! Each model declares how its attributes map onto wire keys. Keys of the
//! form `properties.x` live inside a nested `properties` object on the wire.
//! Serialization itself is serde's job.

mod formula;

pub use formula::{Formula, FormulaPropertiesFromVm};

/// One row of a model's attribute map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeSpec {
    /// Rust-side attribute name
    pub attribute: &'static str,
    /// Dotted wire key
    pub key: &'static str,
    /// Wire type name (`str`, `iso-8601`, `{str}` for string maps, or a model name)
    pub wire_type: &'static str,
}

impl AttributeSpec {
    pub const fn new(attribute: &'static str, key: &'static str, wire_type: &'static str) -> Self {
        Self {
            attribute,
            key,
            wire_type,
        }
    }

    /// Wire key split into its nesting path
    pub fn key_path(&self) -> impl Iterator<Item = &'static str> {
        self.key.split('.')
    }
}

/// A model with a declarative attribute-to-wire mapping
pub trait Model {
    /// Wire type name of the model itself
    const TYPE_NAME: &'static str;

    const ATTRIBUTE_MAP: &'static [AttributeSpec];

    fn attribute_spec(attribute: &str) -> Option<&'static AttributeSpec> {
        Self::ATTRIBUTE_MAP.iter().find(|spec| spec.attribute == attribute)
    }
}
