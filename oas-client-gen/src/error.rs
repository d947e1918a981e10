//! Error types for client generation.
//!
//! Generation is best-effort: malformed schema nodes degrade to `unknown`
//! types instead of failing. Only document-level problems and reference
//! cycles surface as errors.

use thiserror::Error;

/// Result type alias for generation operations.
pub type GenerateResult<T> = Result<T, GenerateError>;

/// Error during client generation.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The document root is not a JSON object.
    #[error("Invalid API document: {message}")]
    InvalidDocument { message: String },

    /// Schemas reference each other in a cycle.
    #[error("Circular schema reference detected: {}", .cycle.join(" -> "))]
    CircularReference { cycle: Vec<String> },
}

impl GenerateError {
    /// Create an invalid document error.
    pub fn invalid_document(message: impl Into<String>) -> Self {
        Self::InvalidDocument {
            message: message.into(),
        }
    }

    /// Create a circular reference error.
    pub fn circular_reference(cycle: Vec<String>) -> Self {
        Self::CircularReference { cycle }
    }
}
