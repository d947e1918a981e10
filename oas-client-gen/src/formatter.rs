//! Wire and domain type expressions.
//!
//! Every property has two TypeScript renderings: the wire type, matching
//! what the API actually sends, and the domain type exposed by value
//! classes (parsed dates, nested value objects, `Map` collections).
//!
//! # Type Mappings
//!
//! | Shape | Wire | Domain |
//! |-------|------|--------|
//! | date-time string | `string` | `Date` |
//! | number / integer | `number` | `number` |
//! | enum reference | `Name` | `Name` |
//! | object reference | `TNameDto` | `Name` |
//! | request reference | `TName` | `TName` |
//! | array | `W[]` | `D[]` |
//! | dictionary | `Record<string, W>` | `Map<string, D>` |

use crate::ir::{PrimitiveType, PropertyDescriptor, PropertyShape};

/// The two renderings of one property type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedType {
    /// Transport-faithful type.
    pub wire: String,
    /// Post-conversion type.
    pub domain: String,
}

impl FormattedType {
    fn same(ty: impl Into<String>) -> Self {
        let ty = ty.into();
        Self {
            wire: ty.clone(),
            domain: ty,
        }
    }
}

/// Name of the wire-shape alias for a model or response component.
pub fn dto_type_name(name: &str) -> String {
    format!("T{}Dto", name)
}

/// Name of the flat alias for a request component.
pub fn request_type_name(name: &str) -> String {
    format!("T{}", name)
}

/// Format a property descriptor.
pub fn format_type(property: &PropertyDescriptor) -> FormattedType {
    format_shape(&property.shape)
}

/// Format a property shape.
pub fn format_shape(shape: &PropertyShape) -> FormattedType {
    match shape {
        PropertyShape::DateTime => FormattedType {
            wire: "string".to_string(),
            domain: "Date".to_string(),
        },
        PropertyShape::EnumRef(name) => FormattedType::same(name.clone()),
        PropertyShape::ObjectRef(name) => FormattedType {
            wire: dto_type_name(name),
            domain: name.clone(),
        },
        PropertyShape::RequestRef(name) => FormattedType::same(request_type_name(name)),
        PropertyShape::Array(items) => {
            let inner = format_type(items);
            FormattedType {
                wire: format!("{}[]", inner.wire),
                domain: format!("{}[]", inner.domain),
            }
        }
        PropertyShape::Dictionary(value) => {
            let inner = format_type(value);
            FormattedType {
                wire: format!("Record<string, {}>", inner.wire),
                domain: format!("Map<string, {}>", inner.domain),
            }
        }
        PropertyShape::Primitive(primitive) => FormattedType::same(primitive_type(primitive)),
    }
}

/// TypeScript type for a primitive.
pub fn primitive_type(primitive: &PrimitiveType) -> String {
    match primitive {
        PrimitiveType::String => "string".to_string(),
        PrimitiveType::Number => "number".to_string(),
        PrimitiveType::Boolean => "boolean".to_string(),
        PrimitiveType::File => "File".to_string(),
        PrimitiveType::Object => "Record<string, unknown>".to_string(),
        PrimitiveType::Unknown => "unknown".to_string(),
        PrimitiveType::Other(raw) => raw.clone(),
    }
}

/// Whether converting wire data to domain data changes the value.
pub fn needs_conversion(shape: &PropertyShape) -> bool {
    match shape {
        PropertyShape::DateTime | PropertyShape::ObjectRef(_) | PropertyShape::Dictionary(_) => true,
        PropertyShape::Array(items) => needs_conversion(&items.shape),
        PropertyShape::Primitive(_) | PropertyShape::EnumRef(_) | PropertyShape::RequestRef(_) => {
            false
        }
    }
}
