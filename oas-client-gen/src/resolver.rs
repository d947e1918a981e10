//! Property resolution.
//!
//! Turns one raw schema-property node into a [`PropertyDescriptor`]. The
//! resolver never fails: nodes it cannot make sense of become
//! `Primitive(Unknown)` so generation always produces output.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::classifier::ClassificationContext;
use crate::document::ref_name;
use crate::ir::{PrimitiveType, PropertyDescriptor, PropertyShape};

const DATE_TIME_FORMAT: &str = "date-time";
const BINARY_FORMAT: &str = "binary";

/// Resolves raw property nodes against a finished pass-1 context.
///
/// Enum and request membership must be complete before resolving, otherwise
/// enum references would be tagged as object references.
#[derive(Debug, Clone, Copy)]
pub struct PropertyResolver<'a> {
    context: &'a ClassificationContext,
}

impl<'a> PropertyResolver<'a> {
    /// Create a resolver over the given context.
    pub fn new(context: &'a ClassificationContext) -> Self {
        Self { context }
    }

    /// Resolve a JSON property of an object schema.
    pub fn resolve(
        &self,
        name: &str,
        node: &Value,
        required: &BTreeSet<String>,
    ) -> PropertyDescriptor {
        let shape = self.resolve_shape(name, node, false);
        self.finish(name, node, shape, required)
    }

    /// Resolve a property of an inline multipart form schema.
    ///
    /// Binary strings become `File` fields.
    pub fn resolve_form_field(
        &self,
        name: &str,
        node: &Value,
        required: &BTreeSet<String>,
    ) -> PropertyDescriptor {
        let shape = self.resolve_shape(name, node, true);
        self.finish(name, node, shape, required).as_form_field()
    }

    fn finish(
        &self,
        name: &str,
        node: &Value,
        shape: PropertyShape,
        required: &BTreeSet<String>,
    ) -> PropertyDescriptor {
        let nullable = if required.contains(name) {
            false
        } else {
            match explicit_nullable(node) {
                Some(flag) => flag,
                None => shape.reference_name().is_some(),
            }
        };

        PropertyDescriptor::new(name, shape)
            .with_nullable(nullable)
            .with_format(format_of(node).map(str::to_string))
    }

    /// Resolve a nested schema node (array items, dictionary values).
    fn resolve_nested(&self, name: &str, node: &Value, form: bool) -> PropertyDescriptor {
        let shape = self.resolve_shape(name, node, form);
        PropertyDescriptor::new(name, shape)
            .with_nullable(explicit_nullable(node).unwrap_or(false))
            .with_format(format_of(node).map(str::to_string))
    }

    fn resolve_shape(&self, name: &str, node: &Value, form: bool) -> PropertyShape {
        if let Some(reference) = node.get("$ref").and_then(Value::as_str) {
            return self.reference_shape(name, reference);
        }

        let Some(tag) = type_tag(node) else {
            return self.union_fallback(name, node, form);
        };

        match tag {
            "array" => {
                let items = node
                    .get("items")
                    .map(|items| self.resolve_nested("item", items, form))
                    .unwrap_or_else(|| {
                        PropertyDescriptor::new("item", PropertyShape::Primitive(PrimitiveType::Unknown))
                    });
                PropertyShape::Array(Box::new(items))
            }
            "object" => match node.get("additionalProperties") {
                Some(Value::Bool(true)) => PropertyShape::Dictionary(Box::new(
                    PropertyDescriptor::new("value", PropertyShape::Primitive(PrimitiveType::Unknown)),
                )),
                Some(value @ Value::Object(_)) => {
                    PropertyShape::Dictionary(Box::new(self.resolve_nested("value", value, form)))
                }
                _ => PropertyShape::Primitive(PrimitiveType::Object),
            },
            "string" => match format_of(node) {
                Some(DATE_TIME_FORMAT) => PropertyShape::DateTime,
                Some(BINARY_FORMAT) if form => PropertyShape::Primitive(PrimitiveType::File),
                _ => PropertyShape::Primitive(PrimitiveType::String),
            },
            other => PropertyShape::Primitive(PrimitiveType::from_tag(other)),
        }
    }

    fn reference_shape(&self, name: &str, reference: &str) -> PropertyShape {
        let Some(target) = ref_name(reference) else {
            tracing::debug!(property = %name, reference = %reference, "unresolvable $ref, using unknown");
            return PropertyShape::Primitive(PrimitiveType::Unknown);
        };

        if self.context.is_enum(target) {
            PropertyShape::EnumRef(target.to_string())
        } else if self.context.is_request(target) {
            PropertyShape::RequestRef(target.to_string())
        } else {
            PropertyShape::ObjectRef(target.to_string())
        }
    }

    /// `oneOf` without `type`: take the first member only.
    ///
    /// This is a lossy approximation for multi-member unions.
    fn union_fallback(&self, name: &str, node: &Value, form: bool) -> PropertyShape {
        let first = node
            .get("oneOf")
            .and_then(Value::as_array)
            .and_then(|members| members.first());

        match first {
            Some(member) => {
                tracing::debug!(property = %name, "oneOf union approximated by its first member");
                if member.get("$ref").is_some() || type_tag(member).is_some() {
                    self.resolve_shape(name, member, form)
                } else {
                    PropertyShape::Primitive(PrimitiveType::Unknown)
                }
            }
            None => {
                tracing::debug!(property = %name, "property has no type information, using unknown");
                PropertyShape::Primitive(PrimitiveType::Unknown)
            }
        }
    }
}

/// The `type` tag, accepting the `["string", "null"]` list form.
fn type_tag(node: &Value) -> Option<&str> {
    match node.get("type")? {
        Value::String(tag) => Some(tag.as_str()),
        Value::Array(tags) => tags
            .iter()
            .filter_map(Value::as_str)
            .find(|tag| *tag != "null"),
        _ => None,
    }
}

/// Explicit nullability: `nullable: bool`, or `null` in a type list.
fn explicit_nullable(node: &Value) -> Option<bool> {
    if let Some(flag) = node.get("nullable").and_then(Value::as_bool) {
        return Some(flag);
    }
    match node.get("type") {
        Some(Value::Array(tags)) if tags.iter().any(|t| t.as_str() == Some("null")) => Some(true),
        _ => None,
    }
}

fn format_of(node: &Value) -> Option<&str> {
    node.get("format").and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context() -> ClassificationContext {
        let mut ctx = ClassificationContext::new();
        ctx.record_enum("Color");
        ctx.record_request_usage("CreateWidget");
        ctx
    }

    fn resolve(node: Value) -> PropertyDescriptor {
        let ctx = context();
        PropertyResolver::new(&ctx).resolve("field", &node, &BTreeSet::new())
    }

    #[test]
    fn test_primitive_types() {
        assert_eq!(
            resolve(json!({ "type": "integer" })).shape,
            PropertyShape::Primitive(PrimitiveType::Number)
        );
        assert_eq!(
            resolve(json!({ "type": "number", "format": "double" })).shape,
            PropertyShape::Primitive(PrimitiveType::Number)
        );
        assert_eq!(
            resolve(json!({ "type": "boolean" })).shape,
            PropertyShape::Primitive(PrimitiveType::Boolean)
        );
    }

    #[test]
    fn test_date_time_detection() {
        let prop = resolve(json!({ "type": "string", "format": "date-time" }));
        assert_eq!(prop.shape, PropertyShape::DateTime);
        assert_eq!(prop.format.as_deref(), Some("date-time"));
        assert!(!prop.nullable);
    }

    #[test]
    fn test_reference_classification() {
        assert_eq!(
            resolve(json!({ "$ref": "#/components/schemas/Color" })).shape,
            PropertyShape::EnumRef("Color".into())
        );
        assert_eq!(
            resolve(json!({ "$ref": "#/components/schemas/Tag" })).shape,
            PropertyShape::ObjectRef("Tag".into())
        );
        assert_eq!(
            resolve(json!({ "$ref": "#/components/schemas/CreateWidget" })).shape,
            PropertyShape::RequestRef("CreateWidget".into())
        );
    }

    #[test]
    fn test_reference_is_nullable_by_default() {
        assert!(resolve(json!({ "$ref": "#/components/schemas/Tag" })).nullable);
        assert!(!resolve(json!({ "$ref": "#/components/schemas/Tag", "nullable": false })).nullable);
    }

    #[test]
    fn test_required_forces_non_nullable() {
        let ctx = context();
        let required: BTreeSet<String> = ["field".to_string()].into();
        let prop = PropertyResolver::new(&ctx).resolve(
            "field",
            &json!({ "$ref": "#/components/schemas/Tag", "nullable": true }),
            &required,
        );
        assert!(!prop.nullable);
    }

    #[test]
    fn test_array_of_refs() {
        let prop = resolve(json!({ "type": "array", "items": { "$ref": "#/components/schemas/Tag" } }));
        let items = prop.shape.items().unwrap();
        assert_eq!(items.shape, PropertyShape::ObjectRef("Tag".into()));
        assert!(!prop.nullable);
    }

    #[test]
    fn test_dictionary_detection() {
        let prop = resolve(json!({
            "type": "object",
            "additionalProperties": { "type": "array", "items": { "$ref": "#/components/schemas/Tag" } }
        }));
        let value = prop.shape.value_type().unwrap();
        assert_eq!(
            value.shape.items().unwrap().shape,
            PropertyShape::ObjectRef("Tag".into())
        );

        let plain = resolve(json!({ "type": "object" }));
        assert_eq!(plain.shape, PropertyShape::Primitive(PrimitiveType::Object));
    }

    #[test]
    fn test_one_of_takes_first_member() {
        let prop = resolve(json!({
            "oneOf": [
                { "$ref": "#/components/schemas/Cat" },
                { "$ref": "#/components/schemas/Dog" }
            ]
        }));
        assert_eq!(prop.shape, PropertyShape::ObjectRef("Cat".into()));
    }

    #[test]
    fn test_missing_type_information_degrades_to_unknown() {
        assert_eq!(
            resolve(json!({ "description": "mystery" })).shape,
            PropertyShape::Primitive(PrimitiveType::Unknown)
        );
        assert_eq!(
            resolve(json!({ "$ref": "#/components/schemas/" })).shape,
            PropertyShape::Primitive(PrimitiveType::Unknown)
        );
        assert_eq!(
            resolve(json!({ "oneOf": [{ "description": "no type" }] })).shape,
            PropertyShape::Primitive(PrimitiveType::Unknown)
        );
    }

    #[test]
    fn test_type_list_with_null() {
        let prop = resolve(json!({ "type": ["string", "null"] }));
        assert_eq!(prop.shape, PropertyShape::Primitive(PrimitiveType::String));
        assert!(prop.nullable);
    }

    #[test]
    fn test_form_field_binary_is_file() {
        let ctx = context();
        let prop = PropertyResolver::new(&ctx).resolve_form_field(
            "upload",
            &json!({ "type": "string", "format": "binary" }),
            &BTreeSet::new(),
        );
        assert_eq!(prop.shape, PropertyShape::Primitive(PrimitiveType::File));
        assert!(prop.is_form_field);

        let json_binary = resolve(json!({ "type": "string", "format": "binary" }));
        assert_eq!(json_binary.shape, PropertyShape::Primitive(PrimitiveType::String));
    }
}
