//! API document loading.
//!
//! `http://` and `https://` locations are fetched over the network;
//! anything else is a local path, optionally `file://`-prefixed.

use std::path::PathBuf;

use oas_client_gen::ApiDocument;
use serde_json::Value;

use crate::error::{CliError, CliResult, SourceError};

/// Where an API document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentLocation {
    Remote(String),
    Local(PathBuf),
}

impl DocumentLocation {
    /// Classify a configured location string.
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            DocumentLocation::Remote(location.to_string())
        } else {
            let path = location.strip_prefix("file://").unwrap_or(location);
            DocumentLocation::Local(PathBuf::from(path))
        }
    }
}

/// Fetch and parse the document at `location`.
pub async fn load_document(location: &str) -> CliResult<ApiDocument> {
    let body = match DocumentLocation::parse(location) {
        DocumentLocation::Remote(url) => fetch_remote(&url).await?,
        DocumentLocation::Local(path) => read_local(path).await?,
    };

    let value: Value =
        serde_json::from_str(&body).map_err(|e| SourceError::json(location, e))?;
    ApiDocument::from_value(value).map_err(CliError::from)
}

async fn fetch_remote(url: &str) -> Result<String, SourceError> {
    tracing::debug!(url = %url, "fetching API document");

    let http_error = |source| SourceError::Http {
        url: url.to_string(),
        source,
    };
    let response = reqwest::get(url).await.map_err(http_error)?;
    if !response.status().is_success() {
        return Err(SourceError::Status {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }
    response.text().await.map_err(http_error)
}

async fn read_local(path: PathBuf) -> Result<String, SourceError> {
    tracing::debug!(path = %path.display(), "reading API document");

    tokio::fs::read_to_string(&path)
        .await
        .map_err(|source| SourceError::Io { path, source })
}
