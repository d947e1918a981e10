//! Name derivation helpers.
//!
//! Identifiers in the generated module are derived from document strings
//! (operation ids, endpoint templates, property keys). These helpers keep
//! the derivations in one place.

use convert_case::{Case, Casing};
use serde_json::Value;

/// Split on runs of non-alphanumeric characters.
fn segments(s: &str) -> impl Iterator<Item = &str> {
    s.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|segment| !segment.is_empty())
}

/// Title-case every segment and concatenate: `/widgets/{id}` -> `WidgetsId`.
pub fn pascal_segments(s: &str) -> String {
    segments(s).map(|segment| segment.to_case(Case::Pascal)).collect()
}

/// Camel-cased identifier built from the segments of `s`.
pub fn camel_segments(s: &str) -> String {
    pascal_segments(s).to_case(Case::Camel)
}

/// Method name from an `operationId`: `list_widgets` -> `listWidgets`.
pub fn method_name_from_operation_id(operation_id: &str) -> String {
    camel_segments(operation_id)
}

/// Whether `s` is a plain TypeScript identifier.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}

/// Double-quoted, escaped string literal.
pub fn string_literal(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}

/// Property key for a type or class member declaration.
pub fn property_key(name: &str) -> String {
    if is_identifier(name) {
        name.to_string()
    } else {
        string_literal(name)
    }
}

/// Member access expression: `dto.name` or `dto["content-type"]`.
pub fn property_access(target: &str, name: &str) -> String {
    if is_identifier(name) {
        format!("{}.{}", target, name)
    } else {
        format!("{}[{}]", target, string_literal(name))
    }
}

/// Enum member name for a display label.
///
/// Enum members may not have numeric names, so numeric-looking labels get a
/// `Value` prefix; other non-identifiers are quoted.
pub fn enum_member_name(label: &str) -> String {
    if is_identifier(label) {
        return label.to_string();
    }
    if label.parse::<f64>().is_ok() {
        let cleaned: String = label
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        return format!("Value{}", cleaned);
    }
    string_literal(label)
}
