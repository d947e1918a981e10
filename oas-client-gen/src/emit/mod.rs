//! TypeScript emission.
//!
//! Builders turn classified components and mapped operations into
//! structured declarations ([`EnumDeclaration`], [`DtoAlias`],
//! [`ValueClass`], [`ClientMethod`]); [`generate_module`] renders them in a
//! fixed order behind a provenance header.

mod client;
mod code;
mod component;
mod conversion;
mod declaration;
mod module;
mod options;

pub use client::{CallBody, ClientClass, ClientMethod, ClientRenderer, FormField, ResponseValue};
pub use code::CodeBuffer;
pub use component::ComponentRenderer;
pub use conversion::constructor_expression;
pub use declaration::{
    Assignment, Declaration, DtoAlias, EnumDeclaration, EnumMember, FieldDeclaration, Render,
    ValueClass,
};
pub use module::{
    generate_module, without_timestamp, GeneratedModule, GenerationStats, TIMESTAMP_LINE_PREFIX,
};
pub use options::{EmitOptions, GenerateOptions, IndentStyle, LineEnding, GENERATOR_NAME};
