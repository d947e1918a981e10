//! Property descriptor definitions.
//!
//! A [`PropertyDescriptor`] is the normalized form of one raw schema
//! property. Its [`PropertyShape`] is a tagged variant, so exactly one of
//! primitive / date / reference / array / dictionary is ever active.

use serde::{Deserialize, Serialize};

/// Normalized shape of one schema property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    /// Property key (the form field name for form-field properties).
    pub name: String,

    /// The resolved shape.
    pub shape: PropertyShape,

    /// Whether the property may be absent or null.
    pub nullable: bool,

    /// Raw `format` keyword (e.g. `date-time`, `binary`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Whether this property is a multipart form field.
    #[serde(default)]
    pub is_form_field: bool,
}

impl PropertyDescriptor {
    /// Create a non-nullable descriptor with the given shape.
    pub fn new(name: impl Into<String>, shape: PropertyShape) -> Self {
        Self {
            name: name.into(),
            shape,
            nullable: false,
            format: None,
            is_form_field: false,
        }
    }

    /// Set the nullable flag.
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Set the raw format.
    pub fn with_format(mut self, format: Option<String>) -> Self {
        self.format = format;
        self
    }

    /// Mark as a multipart form field.
    pub fn as_form_field(mut self) -> Self {
        self.is_form_field = true;
        self
    }

    /// Name of the referenced schema, if this property is a reference.
    pub fn reference_name(&self) -> Option<&str> {
        self.shape.reference_name()
    }

    /// Whether the property references an enum component.
    pub fn reference_is_enum(&self) -> bool {
        matches!(self.shape, PropertyShape::EnumRef(_))
    }
}

/// The one active shape of a property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum PropertyShape {
    /// A primitive (or pass-through) type.
    Primitive(PrimitiveType),

    /// `type: string` with `format: date-time`.
    DateTime,

    /// Reference to an enum component.
    EnumRef(String),

    /// Reference to a model or response component.
    ObjectRef(String),

    /// Reference to a request component (flat input type, no value class).
    RequestRef(String),

    /// Array of the item shape.
    Array(Box<PropertyDescriptor>),

    /// String-keyed map of the value shape.
    Dictionary(Box<PropertyDescriptor>),
}

impl PropertyShape {
    /// Name of the referenced schema for reference shapes.
    pub fn reference_name(&self) -> Option<&str> {
        match self {
            PropertyShape::EnumRef(name)
            | PropertyShape::ObjectRef(name)
            | PropertyShape::RequestRef(name) => Some(name.as_str()),
            _ => None,
        }
    }

    /// Array item descriptor, if this is an array.
    pub fn items(&self) -> Option<&PropertyDescriptor> {
        match self {
            PropertyShape::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Dictionary value descriptor, if this is a dictionary.
    pub fn value_type(&self) -> Option<&PropertyDescriptor> {
        match self {
            PropertyShape::Dictionary(value) => Some(value),
            _ => None,
        }
    }

    /// Collect every `ObjectRef` name reachable through containers.
    pub fn collect_object_refs<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            PropertyShape::ObjectRef(name) => out.push(name),
            PropertyShape::Array(inner) | PropertyShape::Dictionary(inner) => {
                inner.shape.collect_object_refs(out)
            }
            _ => {}
        }
    }
}

/// Primitive type tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrimitiveType {
    String,
    /// `number` and `integer` unified.
    Number,
    Boolean,
    /// Binary form field.
    File,
    /// Free-form object without a value schema.
    Object,
    /// Type could not be determined.
    Unknown,
    /// Unrecognized raw tag, passed through unchanged.
    Other(String),
}

impl PrimitiveType {
    /// Map a raw `type` tag to a primitive.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "string" => PrimitiveType::String,
            "number" | "integer" => PrimitiveType::Number,
            "boolean" => PrimitiveType::Boolean,
            "object" => PrimitiveType::Object,
            other => PrimitiveType::Other(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_builder() {
        let prop = PropertyDescriptor::new("id", PropertyShape::Primitive(PrimitiveType::Number))
            .with_nullable(true)
            .with_format(Some("int64".to_string()));
        assert!(prop.nullable);
        assert_eq!(prop.format.as_deref(), Some("int64"));
        assert!(!prop.is_form_field);
        assert!(prop.reference_name().is_none());
    }

    #[test]
    fn test_reference_accessors() {
        let enum_ref = PropertyDescriptor::new("color", PropertyShape::EnumRef("Color".into()));
        assert_eq!(enum_ref.reference_name(), Some("Color"));
        assert!(enum_ref.reference_is_enum());

        let obj_ref = PropertyDescriptor::new("tag", PropertyShape::ObjectRef("Tag".into()));
        assert!(!obj_ref.reference_is_enum());
    }

    #[test]
    fn test_collect_object_refs_through_containers() {
        let inner = PropertyDescriptor::new("", PropertyShape::ObjectRef("Tag".into()));
        let array = PropertyDescriptor::new("", PropertyShape::Array(Box::new(inner)));
        let dict = PropertyShape::Dictionary(Box::new(array));

        let mut refs = Vec::new();
        dict.collect_object_refs(&mut refs);
        assert_eq!(refs, vec!["Tag"]);

        let color = PropertyShape::EnumRef("Color".into());
        let mut none = Vec::new();
        color.collect_object_refs(&mut none);
        assert!(none.is_empty());
    }

    #[test]
    fn test_primitive_from_tag() {
        assert_eq!(PrimitiveType::from_tag("integer"), PrimitiveType::Number);
        assert_eq!(PrimitiveType::from_tag("number"), PrimitiveType::Number);
        assert_eq!(
            PrimitiveType::from_tag("null"),
            PrimitiveType::Other("null".to_string())
        );
    }
}
