//! # oas-client-gen
//!
//! Generates strongly typed TypeScript API clients from OpenAPI-style JSON
//! documents.
//!
//! ## Overview
//!
//! Every named schema is classified into exactly one kind, and every
//! operation becomes one method on a client class that extends a runtime
//! base client:
//!
//! | Kind | Emitted as |
//! |------|------------|
//! | Enum | `export enum Name { ... }` |
//! | Request | `export type TName = { ... }` |
//! | Response / Model | `export type TNameDto = { ... }` plus `export class Name` with a converting constructor |
//!
//! The DTO alias keeps the wire shape (date strings, nested DTOs, records);
//! the value class exposes the domain shape (`Date`, nested value classes,
//! `Map`).
//!
//! ## Pipeline
//!
//! 1. [`SchemaClassifier`] pass 1 collects enum names, request/response
//!    usage and synthesizes multipart form requests.
//! 2. Pass 2 classifies every schema, resolving properties with
//!    [`PropertyResolver`].
//! 3. [`ReferenceGraph`] rejects reference cycles (unless allowed).
//! 4. [`OperationMapper`] derives per-operation metadata and the method shape.
//! 5. [`generate_module`] renders everything in a fixed order.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use oas_client_gen::{generate_module, ApiDocument, GenerateOptions};
//!
//! let document = ApiDocument::from_value(serde_json::from_str(&json)?)?;
//! let options = GenerateOptions::new("PetStoreClient", "https://petstore.example")
//!     .with_source_location("openapi.json")
//!     .with_streamed_endpoints(["/chat"]);
//! let module = generate_module(&document, &options)?;
//! std::fs::write("PetStoreClient.ts", module.content)?;
//! ```

pub mod classifier;
pub mod document;
pub mod emit;
pub mod error;
pub mod formatter;
pub mod graph;
pub mod ir;
pub mod naming;
pub mod operations;
pub mod resolver;

pub use classifier::{ClassificationContext, SchemaClassifier};
pub use document::ApiDocument;
pub use emit::{
    generate_module, without_timestamp, EmitOptions, GenerateOptions, GeneratedModule,
    GenerationStats, IndentStyle, LineEnding,
};
pub use error::{GenerateError, GenerateResult};
pub use formatter::{format_type, FormattedType};
pub use graph::ReferenceGraph;
pub use ir::{
    ApiOperation, Component, ComponentKind, HttpMethod, MethodShape, PropertyDescriptor,
    PropertyShape,
};
pub use operations::OperationMapper;
pub use resolver::PropertyResolver;
