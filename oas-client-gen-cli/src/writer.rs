//! Client module output.
//!
//! Writes each generated module to `{outputBaseDirectory}/{clientName}.ts`,
//! creating the directory when absent and replacing any previous file.

use crate::error::{CliResult, WriteError};
use std::path::{Path, PathBuf};

/// Result of a write operation.
#[derive(Debug)]
pub enum WriteResult {
    /// File was written successfully.
    Written {
        /// Path to the written file.
        path: PathBuf,
        /// Number of bytes written.
        bytes: usize,
    },
    /// Dry run - content was not written.
    DryRun {
        /// Content that would have been written.
        content: String,
        /// Path where content would have been written.
        path: PathBuf,
    },
}

/// Module writer with dry-run support.
#[derive(Debug, Clone, Copy)]
pub struct ModuleWriter {
    dry_run: bool,
}

impl ModuleWriter {
    /// Create a new writer.
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Write a module, fully overwriting any existing file.
    ///
    /// In dry-run mode, returns the content without touching the disk.
    pub async fn write(&self, path: &Path, content: &str) -> CliResult<WriteResult> {
        if self.dry_run {
            return Ok(WriteResult::DryRun {
                content: content.to_string(),
                path: path.to_path_buf(),
            });
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| WriteError::CreateDir {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        tokio::fs::write(path, content)
            .await
            .map_err(|e| WriteError::WriteFile {
                path: path.to_path_buf(),
                source: e,
            })?;

        tracing::debug!(path = %path.display(), bytes = content.len(), "wrote client module");

        Ok(WriteResult::Written {
            path: path.to_path_buf(),
            bytes: content.len(),
        })
    }

    /// Check if running in dry-run mode.
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

impl WriteResult {
    /// Get the path associated with this result.
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path, .. } => path,
            WriteResult::DryRun { path, .. } => path,
        }
    }

    /// Check if the write was successful (not dry-run).
    pub fn was_written(&self) -> bool {
        matches!(self, WriteResult::Written { .. })
    }
}
