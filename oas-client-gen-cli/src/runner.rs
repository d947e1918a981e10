//! Multi-source generation loop.
//!
//! API sources are processed strictly one at a time: fetch, classify,
//! render, write. A source that fails to load or generate is reported and
//! skipped; the remaining sources still run.

use std::path::PathBuf;

use oas_client_gen::{generate_module, without_timestamp, EmitOptions, GeneratedModule};

use crate::config::ApiSource;
use crate::error::{CliError, CliResult};
use crate::source::load_document;
use crate::writer::{ModuleWriter, WriteResult};

/// What happened to one API source.
#[derive(Debug)]
pub struct SourceReport {
    /// Client name of the source.
    pub client_name: String,
    /// Generated module and write result, or the error that stopped it.
    pub outcome: CliResult<(GeneratedModule, WriteResult)>,
}

/// Validation status of one API source.
#[derive(Debug)]
pub enum ValidationStatus {
    /// Existing file matches a fresh generation.
    UpToDate,
    /// Existing file differs.
    Outdated,
    /// No file at the output path.
    Missing,
    /// The source could not be regenerated.
    Failed(CliError),
}

/// Validation report of one API source.
#[derive(Debug)]
pub struct ValidationReport {
    pub client_name: String,
    pub path: PathBuf,
    pub status: ValidationStatus,
}

/// Runs generation over configured API sources.
#[derive(Debug, Clone)]
pub struct Runner {
    writer: ModuleWriter,
    emit: EmitOptions,
}

impl Runner {
    /// Create a runner.
    pub fn new(writer: ModuleWriter) -> Self {
        Self {
            writer,
            emit: EmitOptions::default(),
        }
    }

    /// Override emit options (layout, pinned timestamp).
    pub fn with_emit(mut self, emit: EmitOptions) -> Self {
        self.emit = emit;
        self
    }

    /// Generate and write every source, in order.
    pub async fn run(&self, sources: &[ApiSource]) -> Vec<SourceReport> {
        let mut reports = Vec::with_capacity(sources.len());
        for source in sources {
            let outcome = self.run_source(source).await;
            if let Err(ref e) = outcome {
                tracing::error!(
                    client = %source.client_name,
                    document = %source.document_url,
                    error = %e,
                    "skipping API source"
                );
            }
            reports.push(SourceReport {
                client_name: source.client_name.clone(),
                outcome,
            });
        }
        reports
    }

    async fn run_source(&self, source: &ApiSource) -> CliResult<(GeneratedModule, WriteResult)> {
        let module = self.generate(source).await?;
        let written = self.writer.write(&source.output_path(), &module.content).await?;
        Ok((module, written))
    }

    /// Fetch and generate one source without writing.
    pub async fn generate(&self, source: &ApiSource) -> CliResult<GeneratedModule> {
        tracing::info!(
            client = %source.client_name,
            document = %source.document_url,
            "generating client"
        );
        let document = load_document(&source.document_url).await?;
        let options = source.generate_options().with_emit(self.emit.clone());
        Ok(generate_module(&document, &options)?)
    }

    /// Regenerate every source and compare with the files on disk, ignoring
    /// the timestamp line.
    pub async fn validate(&self, sources: &[ApiSource]) -> Vec<ValidationReport> {
        let mut reports = Vec::with_capacity(sources.len());
        for source in sources {
            let path = source.output_path();
            let status = self.validate_source(source, &path).await;
            reports.push(ValidationReport {
                client_name: source.client_name.clone(),
                path,
                status,
            });
        }
        reports
    }

    async fn validate_source(&self, source: &ApiSource, path: &std::path::Path) -> ValidationStatus {
        let existing = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return ValidationStatus::Missing,
            Err(e) => return ValidationStatus::Failed(e.into()),
        };
        match self.generate(source).await {
            Ok(module) if without_timestamp(&module.content) == without_timestamp(&existing) => {
                ValidationStatus::UpToDate
            }
            Ok(_) => ValidationStatus::Outdated,
            Err(e) => ValidationStatus::Failed(e),
        }
    }
}

impl SourceReport {
    /// Whether the source was generated.
    pub fn succeeded(&self) -> bool {
        self.outcome.is_ok()
    }
}

impl ValidationStatus {
    /// Whether the status passes validation.
    pub fn is_ok(&self) -> bool {
        matches!(self, ValidationStatus::UpToDate)
    }
}
