//! Configuration management for the CLI.
//!
//! This module handles loading configuration from `oas-client-gen.toml`
//! files, merging every `[[apis]]` entry over `[defaults]`, and applying
//! command-line overrides.

use crate::error::{CliResult, ConfigError};
use oas_client_gen::GenerateOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default configuration filename.
pub const CONFIG_FILENAME: &str = "oas-client-gen.toml";

/// Extension of generated client modules.
pub const OUTPUT_EXTENSION: &str = "ts";

/// Main configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Values every API entry inherits.
    pub defaults: ApiSettings,

    /// One entry per generated client.
    pub apis: Vec<ApiSettings>,
}

/// Settings for one API source. Every key is optional here; required keys
/// are checked after merging over the defaults.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiSettings {
    /// File path or `http(s)` URL of the OpenAPI JSON document.
    pub open_api_json_document_url: Option<String>,

    /// Name of the generated client class and output file.
    pub client_name: Option<String>,

    /// Base URL passed to the runtime client.
    pub client_base_url_value: Option<String>,

    /// Directory the client module is written to.
    pub output_base_directory: Option<PathBuf>,

    /// Endpoint templates rendered as streamed sequences.
    pub streamed_endpoints: Option<Vec<String>>,

    /// Module specifier of the runtime base client.
    pub runtime_import: Option<String>,

    /// Class name of the runtime base client.
    pub runtime_class: Option<String>,

    /// Tolerate recursive schemas instead of failing.
    pub allow_recursive_schemas: Option<bool>,
}

impl ApiSettings {
    /// Merge these settings over `defaults`, key by key.
    pub fn merged_over(&self, defaults: &ApiSettings) -> ApiSettings {
        ApiSettings {
            open_api_json_document_url: self
                .open_api_json_document_url
                .clone()
                .or_else(|| defaults.open_api_json_document_url.clone()),
            client_name: self.client_name.clone().or_else(|| defaults.client_name.clone()),
            client_base_url_value: self
                .client_base_url_value
                .clone()
                .or_else(|| defaults.client_base_url_value.clone()),
            output_base_directory: self
                .output_base_directory
                .clone()
                .or_else(|| defaults.output_base_directory.clone()),
            streamed_endpoints: self
                .streamed_endpoints
                .clone()
                .or_else(|| defaults.streamed_endpoints.clone()),
            runtime_import: self
                .runtime_import
                .clone()
                .or_else(|| defaults.runtime_import.clone()),
            runtime_class: self
                .runtime_class
                .clone()
                .or_else(|| defaults.runtime_class.clone()),
            allow_recursive_schemas: self
                .allow_recursive_schemas
                .or(defaults.allow_recursive_schemas),
        }
    }
}

/// A fully resolved API source, ready to generate.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiSource {
    /// Position of the entry in `[[apis]]`.
    pub index: usize,
    pub document_url: String,
    pub client_name: String,
    pub base_url: String,
    pub output_dir: PathBuf,
    pub streamed_endpoints: Vec<String>,
    pub runtime_import: String,
    pub runtime_class: String,
    pub allow_recursive_schemas: bool,
}

impl ApiSource {
    /// `{outputBaseDirectory}/{clientName}.ts`
    pub fn output_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", self.client_name, OUTPUT_EXTENSION))
    }

    /// Generation options for this source.
    pub fn generate_options(&self) -> GenerateOptions {
        GenerateOptions::new(&self.client_name, &self.base_url)
            .with_source_location(&self.document_url)
            .with_streamed_endpoints(self.streamed_endpoints.iter().cloned())
            .with_runtime(&self.runtime_import, &self.runtime_class)
            .with_allow_recursive_schemas(self.allow_recursive_schemas)
    }
}

/// Configuration manager for loading and merging configs.
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration from a file path.
    ///
    /// If the path is None, loads from the default location. A missing file
    /// is an error: without `[[apis]]` there is nothing to generate.
    pub fn load(path: Option<&Path>) -> CliResult<Config> {
        let config_path = path
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));

        if !config_path.exists() {
            return Err(ConfigError::not_found(config_path).into());
        }

        let content = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let config = Self::parse(&content, &config_path)?;
        if config.apis.is_empty() {
            return Err(ConfigError::NoApis { path: config_path }.into());
        }

        Ok(config)
    }

    /// Parse configuration text.
    pub fn parse(content: &str, path: &Path) -> Result<Config, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::invalid_toml(path.to_path_buf(), e.to_string()))
    }

    /// Merge CLI arguments into configuration.
    ///
    /// CLI arguments take precedence over config file values, including
    /// per-API values.
    pub fn merge_cli_args(mut config: Config, args: &CliArgs) -> Config {
        if let Some(ref output) = args.output {
            config.defaults.output_base_directory = Some(output.clone());
            for api in &mut config.apis {
                api.output_base_directory = Some(output.clone());
            }
        }

        config
    }

    /// Resolve every API entry.
    ///
    /// Fails on the first entry missing a required key, before anything is
    /// generated.
    pub fn resolve(config: &Config) -> Result<Vec<ApiSource>, ConfigError> {
        config
            .apis
            .iter()
            .enumerate()
            .map(|(index, api)| Self::resolve_one(index, &api.merged_over(&config.defaults)))
            .collect()
    }

    fn resolve_one(index: usize, merged: &ApiSettings) -> Result<ApiSource, ConfigError> {
        let require = |value: &Option<String>, key: &str| {
            value
                .clone()
                .ok_or_else(|| ConfigError::missing_key(index, key))
        };

        Ok(ApiSource {
            index,
            document_url: require(&merged.open_api_json_document_url, "openApiJsonDocumentUrl")?,
            client_name: require(&merged.client_name, "clientName")?,
            base_url: require(&merged.client_base_url_value, "clientBaseUrlValue")?,
            output_dir: merged
                .output_base_directory
                .clone()
                .ok_or_else(|| ConfigError::missing_key(index, "outputBaseDirectory"))?,
            streamed_endpoints: merged.streamed_endpoints.clone().unwrap_or_default(),
            runtime_import: merged
                .runtime_import
                .clone()
                .unwrap_or_else(|| DEFAULT_RUNTIME_IMPORT.to_string()),
            runtime_class: merged
                .runtime_class
                .clone()
                .unwrap_or_else(|| DEFAULT_RUNTIME_CLASS.to_string()),
            allow_recursive_schemas: merged.allow_recursive_schemas.unwrap_or(false),
        })
    }

    /// Write the default configuration file.
    pub fn init(path: &Path, force: bool) -> CliResult<()> {
        if path.exists() && !force {
            return Err(ConfigError::AlreadyExists {
                path: path.to_path_buf(),
            }
            .into());
        }
        std::fs::write(path, Self::default_config_content())?;
        Ok(())
    }

    /// Generate default configuration file content with comments.
    pub fn default_config_content() -> &'static str {
        r#"# oas-client-gen configuration file
#
# Every [[apis]] entry generates one client module. Keys missing from an
# entry are taken from [defaults].

[defaults]
# Directory generated clients are written to ({clientName}.ts)
outputBaseDirectory = "./src/api"

# Endpoint templates consumed as lazy streams (e.g. "/chat/completions")
streamedEndpoints = []

# Runtime base client the generated class extends
runtimeImport = "./ApiClientBase"
runtimeClass = "ApiClientBase"

# Generate even when schemas reference each other in a cycle
allowRecursiveSchemas = false

[[apis]]
# File path or http(s) URL of the OpenAPI JSON document
openApiJsonDocumentUrl = "./openapi.json"

# Name of the generated client class
clientName = "ApiClient"

# Base URL passed to the runtime client
clientBaseUrlValue = "http://localhost:8080"
"#
    }
}

const DEFAULT_RUNTIME_IMPORT: &str = "./ApiClientBase";
const DEFAULT_RUNTIME_CLASS: &str = "ApiClientBase";

/// CLI arguments that can override configuration.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Output directory override.
    pub output: Option<PathBuf>,
}
