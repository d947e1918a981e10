//! Component rendering.
//!
//! - Enum: one `export enum`.
//! - Model / Response: a `T{Name}Dto` wire alias plus a value class whose
//!   constructor converts the wire shape.
//! - Request: a flat `T{Name}` alias only.

use serde_json::Value;

use super::conversion::constructor_expression;
use super::declaration::{
    Assignment, Declaration, DtoAlias, EnumDeclaration, EnumMember, FieldDeclaration, ValueClass,
};
use crate::formatter::{dto_type_name, format_type, request_type_name};
use crate::ir::{Component, EnumComponent, ObjectComponent};
use crate::naming::{enum_member_name, property_access, property_key, string_literal};

/// Builds declarations for classified components.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComponentRenderer;

impl ComponentRenderer {
    /// Create a renderer.
    pub fn new() -> Self {
        Self
    }

    /// Every declaration for one component, in emission order.
    pub fn render(&self, component: &Component) -> Vec<Declaration> {
        match component {
            Component::Enum(e) => vec![Declaration::Enum(self.enum_declaration(e))],
            Component::Request(o) => vec![Declaration::Alias(self.request_alias(o))],
            Component::Response(o) | Component::Model(o) => vec![
                Declaration::Alias(self.dto_alias(o)),
                Declaration::Class(self.value_class(o)),
            ],
        }
    }

    /// `export enum Name { ... }`
    pub fn enum_declaration(&self, component: &EnumComponent) -> EnumDeclaration {
        let members = component
            .members()
            .into_iter()
            .zip(&component.values)
            .map(|((label, raw), value)| EnumMember {
                label: enum_member_name(&label),
                value: enum_value(component.numeric, value, &raw),
            })
            .collect();

        EnumDeclaration {
            name: component.name.clone(),
            members,
        }
    }

    /// Wire alias `T{Name}Dto`.
    pub fn dto_alias(&self, component: &ObjectComponent) -> DtoAlias {
        DtoAlias {
            name: dto_type_name(&component.name),
            fields: wire_fields(component),
        }
    }

    /// Request alias `T{Name}`.
    pub fn request_alias(&self, component: &ObjectComponent) -> DtoAlias {
        DtoAlias {
            name: request_type_name(&component.name),
            fields: wire_fields(component),
        }
    }

    /// Value class with a converting constructor.
    pub fn value_class(&self, component: &ObjectComponent) -> ValueClass {
        let fields = component
            .properties
            .iter()
            .map(|property| FieldDeclaration {
                key: property_key(&property.name),
                ty: format_type(property).domain,
                optional: property.nullable,
            })
            .collect();

        let assignments = component
            .properties
            .iter()
            .map(|property| Assignment {
                target: property_access("this", &property.name),
                expr: constructor_expression(&property_access("dto", &property.name), property),
            })
            .collect();

        ValueClass {
            name: component.name.clone(),
            dto_name: dto_type_name(&component.name),
            fields,
            assignments,
        }
    }
}

fn wire_fields(component: &ObjectComponent) -> Vec<FieldDeclaration> {
    component
        .properties
        .iter()
        .map(|property| FieldDeclaration {
            key: property_key(&property.name),
            ty: format_type(property).wire,
            optional: property.nullable,
        })
        .collect()
}

/// Numeric enums keep numbers unquoted; textual enums quote every value.
fn enum_value(numeric: bool, value: &Value, raw: &str) -> String {
    match value {
        Value::Number(n) if numeric => n.to_string(),
        _ => string_literal(raw),
    }
}
