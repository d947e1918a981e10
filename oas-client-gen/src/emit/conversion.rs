//! Wire-to-domain conversion expressions.
//!
//! Value-class constructors turn each wire field into its domain form. The
//! expression is derived from the property shape alone:
//!
//! | Shape | Expression |
//! |-------|------------|
//! | date-time | `new Date(x)` |
//! | object reference | `new Name(x)` |
//! | array needing conversion | `x.map((item) => ...)` |
//! | dictionary | `new Map(Object.entries(x))`, mapping values when they need conversion |
//! | anything else | `x` |
//!
//! Closure parameters are suffixed with the nesting depth past the first
//! level (`item`, `item1`, ...), so nested lambdas never shadow each other.

use crate::formatter::{format_type, needs_conversion};
use crate::ir::{PropertyDescriptor, PropertyShape};

/// Constructor expression for one property read from `source`.
///
/// Nullable properties only convert present values: absent stays absent
/// and `null` stays `null`.
pub fn constructor_expression(source: &str, property: &PropertyDescriptor) -> String {
    match convert(source, &property.shape, 0) {
        Some(converted) if property.nullable => {
            format!("{} != null ? {} : {}", source, converted, source)
        }
        Some(converted) => converted,
        None => source.to_string(),
    }
}

fn convert(expr: &str, shape: &PropertyShape, depth: usize) -> Option<String> {
    match shape {
        PropertyShape::DateTime => Some(format!("new Date({})", expr)),
        PropertyShape::ObjectRef(name) => Some(format!("new {}({})", name, expr)),
        PropertyShape::Array(items) => {
            if !needs_conversion(&items.shape) {
                return None;
            }
            let item = indexed("item", depth);
            let inner = convert(&item, &items.shape, depth + 1)?;
            Some(format!("{}.map(({}) => {})", expr, item, inner))
        }
        PropertyShape::Dictionary(value) => {
            let key = indexed("key", depth);
            let val = indexed("value", depth);
            match convert(&val, &value.shape, depth + 1) {
                Some(inner) => Some(format!(
                    "new Map(Object.entries({}).map(([{}, {}]) => [{}, {}] as [string, {}]))",
                    expr,
                    key,
                    val,
                    key,
                    inner,
                    format_type(value).domain
                )),
                None => Some(format!("new Map(Object.entries({}))", expr)),
            }
        }
        PropertyShape::Primitive(_) | PropertyShape::EnumRef(_) | PropertyShape::RequestRef(_) => {
            None
        }
    }
}

fn indexed(base: &str, depth: usize) -> String {
    if depth == 0 {
        base.to_string()
    } else {
        format!("{}{}", base, depth)
    }
}
