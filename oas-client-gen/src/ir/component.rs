//! Component definitions.
//!
//! A component is a named schema after classification. Every schema name
//! ends up in exactly one variant.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::property::PropertyDescriptor;

/// A classified named schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Component {
    /// Schema carrying an `enum` keyword.
    Enum(EnumComponent),
    /// Schema used as a request body (or a synthesized form body).
    Request(ObjectComponent),
    /// Schema used as a 200 response body.
    Response(ObjectComponent),
    /// Any other schema.
    Model(ObjectComponent),
}

impl Component {
    /// The component name.
    pub fn name(&self) -> &str {
        match self {
            Component::Enum(e) => &e.name,
            Component::Request(o) | Component::Response(o) | Component::Model(o) => &o.name,
        }
    }

    /// The component kind.
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Enum(_) => ComponentKind::Enum,
            Component::Request(_) => ComponentKind::Request,
            Component::Response(_) => ComponentKind::Response,
            Component::Model(_) => ComponentKind::Model,
        }
    }

    /// Object structure for request/response/model components.
    pub fn as_object(&self) -> Option<&ObjectComponent> {
        match self {
            Component::Enum(_) => None,
            Component::Request(o) | Component::Response(o) | Component::Model(o) => Some(o),
        }
    }
}

/// Component classification tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComponentKind {
    Enum,
    Request,
    Response,
    Model,
}

impl ComponentKind {
    /// Whether components of this kind get a value class with a converting constructor.
    pub fn has_value_class(self) -> bool {
        matches!(self, ComponentKind::Response | ComponentKind::Model)
    }
}

/// Request, response and model structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectComponent {
    /// Schema name.
    pub name: String,

    /// Names from the schema's `required` list.
    #[serde(default)]
    pub required: BTreeSet<String>,

    /// Properties in declaration order.
    #[serde(default)]
    pub properties: Vec<PropertyDescriptor>,
}

impl ObjectComponent {
    /// Create an empty object component.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: BTreeSet::new(),
            properties: Vec::new(),
        }
    }

    /// Look up a property by name.
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// Enumeration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumComponent {
    /// Schema name.
    pub name: String,

    /// Raw values in declaration order.
    pub values: Vec<Value>,

    /// Display names from `x-enumNames`, parallel to `values`. Entries that
    /// are not strings stay as `None` so later labels keep their position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_names: Option<Vec<Option<String>>>,

    /// Whether values are numeric (unquoted) rather than textual.
    pub numeric: bool,
}

impl EnumComponent {
    /// Label/value pairs in declaration order.
    ///
    /// The label is the display name when one exists for that position,
    /// otherwise the raw value rendered as text.
    pub fn members(&self) -> Vec<(String, String)> {
        self.values
            .iter()
            .enumerate()
            .map(|(i, value)| {
                let raw = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                let label = self
                    .display_names
                    .as_ref()
                    .and_then(|names| names.get(i).cloned().flatten())
                    .unwrap_or_else(|| raw.clone());
                (label, raw)
            })
            .collect()
    }
}
