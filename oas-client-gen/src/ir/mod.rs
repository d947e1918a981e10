//! Intermediate representation.
//!
//! Everything the renderers consume: normalized properties, classified
//! components and mapped operations.

mod component;
mod operation;
mod property;

pub use component::{Component, ComponentKind, EnumComponent, ObjectComponent};
pub use operation::{ApiOperation, HttpMethod, MethodShape, QueryParameter};
pub use property::{PrimitiveType, PropertyDescriptor, PropertyShape};
