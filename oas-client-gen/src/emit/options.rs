//! Generation options.

use std::collections::HashSet;

use chrono::{DateTime, SecondsFormat, Utc};

/// Name written into the provenance header.
pub const GENERATOR_NAME: &str = "oas-client-gen";

/// Options for generating one client module.
///
/// Everything is per API source; a multi-source run builds one of these for
/// each `[[apis]]` entry.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Name of the generated client class.
    pub client_name: String,

    /// Base URL passed to the runtime client constructor.
    pub base_url: String,

    /// Where the document was loaded from, echoed into the header.
    pub source_location: String,

    /// Endpoint templates rendered as streamed sequences.
    pub streamed_endpoints: HashSet<String>,

    /// Module specifier the runtime client is imported from.
    pub runtime_import: String,

    /// Runtime client class the generated client extends.
    pub runtime_class: String,

    /// Tolerate `$ref` cycles (warn instead of failing).
    pub allow_recursive_schemas: bool,

    /// Text layout of the emitted module.
    pub emit: EmitOptions,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            client_name: "ApiClient".to_string(),
            base_url: String::new(),
            source_location: String::new(),
            streamed_endpoints: HashSet::new(),
            runtime_import: "./ApiClientBase".to_string(),
            runtime_class: "ApiClientBase".to_string(),
            allow_recursive_schemas: false,
            emit: EmitOptions::default(),
        }
    }
}

impl GenerateOptions {
    /// Create options for a named client.
    pub fn new(client_name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client_name: client_name.into(),
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set the source location shown in the header.
    pub fn with_source_location(mut self, location: impl Into<String>) -> Self {
        self.source_location = location.into();
        self
    }

    /// Set the streamed endpoint templates.
    pub fn with_streamed_endpoints<I, S>(mut self, endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.streamed_endpoints = endpoints.into_iter().map(Into::into).collect();
        self
    }

    /// Set the runtime import specifier and class name.
    pub fn with_runtime(mut self, import: impl Into<String>, class: impl Into<String>) -> Self {
        self.runtime_import = import.into();
        self.runtime_class = class.into();
        self
    }

    /// Set whether recursive schemas are tolerated.
    pub fn with_allow_recursive_schemas(mut self, allow: bool) -> Self {
        self.allow_recursive_schemas = allow;
        self
    }

    /// Set the emit options.
    pub fn with_emit(mut self, emit: EmitOptions) -> Self {
        self.emit = emit;
        self
    }
}

/// Text layout and provenance of the emitted module.
#[derive(Debug, Clone)]
pub struct EmitOptions {
    /// Indentation style
    pub indent: IndentStyle,

    /// Line ending style
    pub line_ending: LineEnding,

    /// Timestamp written into the header. `None` means "now".
    pub generated_at: Option<DateTime<Utc>>,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            indent: IndentStyle::default(),
            line_ending: LineEnding::default(),
            generated_at: None,
        }
    }
}

impl EmitOptions {
    /// Create emit options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the indentation style.
    pub fn with_indent(mut self, indent: IndentStyle) -> Self {
        self.indent = indent;
        self
    }

    /// Set the line ending style.
    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    /// Pin the header timestamp.
    pub fn with_generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = Some(at);
        self
    }

    /// Header timestamp in RFC 3339, UTC, second precision.
    pub fn timestamp(&self) -> String {
        self.generated_at
            .unwrap_or_else(Utc::now)
            .to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

/// Indentation style for generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndentStyle {
    /// Use spaces for indentation (default: 2 spaces)
    #[default]
    Spaces2,

    /// Use 4 spaces for indentation
    Spaces4,

    /// Use tabs for indentation
    Tabs,
}

impl IndentStyle {
    /// Get the indentation string.
    pub fn as_str(&self) -> &str {
        match self {
            IndentStyle::Spaces2 => "  ",
            IndentStyle::Spaces4 => "    ",
            IndentStyle::Tabs => "\t",
        }
    }

    /// Create an indentation string for the given depth.
    pub fn indent(&self, depth: usize) -> String {
        self.as_str().repeat(depth)
    }
}

/// Line ending style for generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    /// Unix-style line endings (LF)
    #[default]
    Lf,

    /// Windows-style line endings (CRLF)
    CrLf,
}

impl LineEnding {
    /// Get the line ending string.
    pub fn as_str(&self) -> &str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}
