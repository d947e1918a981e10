//! Error types for the CLI.
//!
//! Configuration errors abort the whole run. Source and generation errors
//! only fail the API source they belong to.

use std::path::PathBuf;
use thiserror::Error;

pub use oas_client_gen::GenerateError;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Main error type for CLI operations.
#[derive(Debug, Error)]
pub enum CliError {
    /// Error loading configuration.
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    /// Error fetching or parsing an API document.
    #[error("Failed to load API document: {0}")]
    Source(#[from] SourceError),

    /// Error during client generation.
    #[error("Failed to generate client: {0}")]
    Generate(#[from] GenerateError),

    /// Error writing output files.
    #[error("Failed to write output: {0}")]
    Write(#[from] WriteError),

    /// Validation failed (clients out of date).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Generic IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file not found.
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Invalid TOML syntax.
    #[error("Invalid TOML in {path}: {message}")]
    InvalidToml { path: PathBuf, message: String },

    /// A required key is missing after merging an API entry over the defaults.
    #[error("API entry {api_index} is missing required key '{key}'")]
    MissingKey { api_index: usize, key: String },

    /// No `[[apis]]` entries.
    #[error("No API sources configured in {path}")]
    NoApis { path: PathBuf },

    /// Config file already exists and `--force` was not given.
    #[error("Configuration file already exists: {path} (use --force to overwrite)")]
    AlreadyExists { path: PathBuf },

    /// IO error reading config.
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error fetching or parsing an API document.
#[derive(Debug, Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("Request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status.
    #[error("Request to {url} returned status {status}")]
    Status { url: String, status: u16 },

    /// Local document could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Body is not valid JSON.
    #[error("Invalid JSON in {location}: {source}")]
    Json {
        location: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Error writing output files.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Failed to create directory.
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write file.
    #[error("Failed to write file {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Create a not found error.
    pub fn not_found(path: PathBuf) -> Self {
        Self::NotFound { path }
    }

    /// Create an invalid TOML error.
    pub fn invalid_toml(path: PathBuf, message: impl Into<String>) -> Self {
        Self::InvalidToml {
            path,
            message: message.into(),
        }
    }

    /// Create a missing key error.
    pub fn missing_key(api_index: usize, key: impl Into<String>) -> Self {
        Self::MissingKey {
            api_index,
            key: key.into(),
        }
    }
}

impl SourceError {
    /// Create a JSON parse error.
    pub fn json(location: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            location: location.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_display() {
        let err = CliError::from(ConfigError::missing_key(1, "clientName"));
        assert_eq!(
            err.to_string(),
            "Failed to load configuration: API entry 1 is missing required key 'clientName'"
        );
    }

    #[test]
    fn test_status_display() {
        let err = SourceError::Status {
            url: "https://api.example/openapi.json".to_string(),
            status: 404,
        };
        assert_eq!(
            err.to_string(),
            "Request to https://api.example/openapi.json returned status 404"
        );
    }

    #[test]
    fn test_generate_error_converts() {
        let err: CliError = GenerateError::circular_reference(vec!["A".into(), "A".into()]).into();
        assert!(matches!(err, CliError::Generate(_)));
    }
}
