//! # oas-client-gen-cli
//!
//! CLI library for generating TypeScript API clients from OpenAPI documents.
//!
//! This crate wires the `oas-client-gen` engine to its collaborators:
//! configuration, document loading and file output.
//!
//! ## Architecture
//!
//! - [`config`] - Configuration management and TOML parsing
//! - [`source`] - API document loading (local files, `http(s)` URLs)
//! - [`runner`] - Sequential per-source generation and validation
//! - [`writer`] - File output and dry-run support
//! - [`error`] - Error types and handling

pub mod config;
pub mod error;
pub mod runner;
pub mod source;
pub mod writer;

// Re-export main types for convenience
pub use config::{ApiSource, Config, ConfigManager};
pub use error::{CliError, CliResult};
pub use runner::Runner;
pub use source::load_document;
pub use writer::ModuleWriter;
