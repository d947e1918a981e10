//! # oas-client-gen
//!
//! CLI tool for generating TypeScript API clients from OpenAPI documents.
//!
//! ## Usage
//!
//! ```bash
//! # Generate every configured client
//! oas-client-gen generate
//!
//! # Override the output directory of every API
//! oas-client-gen generate --output ./src/api
//!
//! # Dry run to preview the generated modules
//! oas-client-gen generate --dry-run
//!
//! # Initialize configuration
//! oas-client-gen init
//!
//! # Check that generated clients are up-to-date
//! oas-client-gen validate
//! ```

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use oas_client_gen_cli::{
    config::{CliArgs, ConfigManager},
    error::CliError,
    runner::{Runner, ValidationStatus},
    writer::{ModuleWriter, WriteResult},
};

#[derive(Parser)]
#[command(name = "oas-client-gen")]
#[command(author, version, about = "Generate TypeScript API clients from OpenAPI documents", long_about = None)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a client module for every configured API
    Generate {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output directory for generated TypeScript files
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Preview changes without writing files
        #[arg(long)]
        dry_run: bool,
    },

    /// Initialize a new configuration file
    Init {
        /// Output path for configuration file
        #[arg(short, long, default_value = "oas-client-gen.toml")]
        output: PathBuf,

        /// Overwrite existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Validate that generated clients are up-to-date
    Validate {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            print_error(&e);
            match e {
                CliError::Validation(_) => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<ExitCode, CliError> {
    match cli.command {
        Commands::Generate {
            config,
            output,
            dry_run,
        } => cmd_generate(config, output, dry_run).await,

        Commands::Init { output, force } => cmd_init(output, force).map(|()| ExitCode::SUCCESS),

        Commands::Validate { config } => cmd_validate(config).await.map(|()| ExitCode::SUCCESS),
    }
}

/// Generate command implementation.
///
/// Failed sources do not abort the run; they turn the exit code into a
/// failure once every source has been attempted.
async fn cmd_generate(
    config_path: Option<PathBuf>,
    output: Option<PathBuf>,
    dry_run: bool,
) -> Result<ExitCode, CliError> {
    let config = ConfigManager::load(config_path.as_deref())?;
    let config = ConfigManager::merge_cli_args(config, &CliArgs { output });
    let sources = ConfigManager::resolve(&config)?;

    println!(
        "{} {} API source(s)...",
        "Generating clients for".cyan(),
        sources.len()
    );

    let runner = Runner::new(ModuleWriter::new(dry_run));
    let reports = runner.run(&sources).await;

    let mut failed = 0;
    for report in &reports {
        match &report.outcome {
            Ok((module, written)) => {
                let stats = &module.stats;
                println!(
                    "  {} {}: {} request(s), {} response(s), {} enum(s), {} model(s), {} operation(s)",
                    "✓".green(),
                    report.client_name.bold(),
                    stats.requests,
                    stats.responses,
                    stats.enums,
                    stats.models,
                    stats.operations
                );
                print_write_result(written);
            }
            Err(e) => {
                failed += 1;
                println!("  {} {}: {}", "✗".red(), report.client_name.bold(), e);
            }
        }
    }

    if failed > 0 {
        eprintln!(
            "{} {} of {} API source(s) failed",
            "Error:".red().bold(),
            failed,
            reports.len()
        );
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}

fn print_write_result(result: &WriteResult) {
    match result {
        WriteResult::Written { path, bytes } => {
            println!("    Written {} bytes to {}", bytes, path.display());
        }
        WriteResult::DryRun { content, path } => {
            println!(
                "    {} Would write to {}:",
                "[dry-run]".yellow(),
                path.display()
            );
            println!("{}", "─".repeat(60).dimmed());
            println!("{}", content);
            println!("{}", "─".repeat(60).dimmed());
        }
    }
}

/// Init command implementation.
fn cmd_init(output: PathBuf, force: bool) -> Result<(), CliError> {
    ConfigManager::init(&output, force)?;

    println!(
        "{} Created configuration file: {}",
        "✓".green(),
        output.display()
    );

    Ok(())
}

/// Validate command implementation.
async fn cmd_validate(config_path: Option<PathBuf>) -> Result<(), CliError> {
    println!("{}", "Validating generated clients...".cyan());

    let config = ConfigManager::load(config_path.as_deref())?;
    let sources = ConfigManager::resolve(&config)?;

    let runner = Runner::new(ModuleWriter::new(true));
    let reports = runner.validate(&sources).await;

    let mut stale = 0;
    for report in &reports {
        match &report.status {
            ValidationStatus::UpToDate => {
                println!("  {} {} is up-to-date", "✓".green(), report.path.display());
            }
            ValidationStatus::Outdated => {
                stale += 1;
                println!("  {} {} is out of date", "✗".red(), report.path.display());
            }
            ValidationStatus::Missing => {
                stale += 1;
                println!("  {} {} not found", "✗".red(), report.path.display());
            }
            ValidationStatus::Failed(e) => {
                stale += 1;
                println!("  {} {}: {}", "✗".red(), report.client_name.bold(), e);
            }
        }
    }

    if stale > 0 {
        println!("  Run 'oas-client-gen generate' to update");
        return Err(CliError::Validation(format!(
            "{} client(s) are out of date",
            stale
        )));
    }

    Ok(())
}

/// Print an error with formatting.
fn print_error(error: &CliError) {
    eprintln!("{} {}", "Error:".red().bold(), error);
}
