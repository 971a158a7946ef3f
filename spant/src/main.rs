//! Spant CLI - size-class table generator.
//!
//! This is the main entry point for the spant CLI application.
//! It uses clap for argument parsing, loads the configuration and hands the
//! selected table variant to the generate command.

mod commands;
mod config;
mod error;

use std::path::PathBuf;

use clap::Parser;
use spangen_core::Variant;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::traits::CommandDescription;
use commands::{run_generate, GenerateArgs, GenerateCommand};
use config::Config;
use error::{Result, SpantError};

/// Spant - size-class table generator
///
/// Without arguments the default fine + coarse table is written; with the
/// single argument `huge` the huge-page table is written instead.
#[derive(Parser, Debug)]
#[command(name = "spant")]
#[command(author = "Spangen Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = GenerateCommand::description(), long_about = GenerateCommand::help())]
struct Cli {
    /// Table variant; only `huge` is accepted
    #[arg(value_name = "VARIANT")]
    variant: Option<Variant>,

    /// Output path (default: from config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, env = "SPANT_VERBOSE")]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, env = "SPANT_CONFIG")]
    config: Option<PathBuf>,

    /// Disable color output
    #[arg(long, env = "SPANT_NO_COLOR")]
    no_color: bool,

    /// Render span sizes and object counts as integers
    #[arg(long)]
    literal: bool,

    /// Print the class summary to stdout after writing
    #[arg(long)]
    summary: bool,
}

/// Main entry point for the spant CLI.
///
/// Parses command-line arguments, initializes logging, loads configuration,
/// and runs the generator.
fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.no_color)?;

    // Load configuration
    let config = load_config(cli.config.as_deref())?;

    execute(cli, config)
}

/// Initialize the logging system.
///
/// Logs go to stderr; stdout carries only the `--summary` table.
fn init_logging(verbose: bool, no_color: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let subscriber = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()
        .map_err(|e| SpantError::Config(format!("Failed to initialize logging: {}", e)))?;

    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(config_path: Option<&std::path::Path>) -> Result<Config> {
    match config_path {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    }
}

/// Run the generator for the parsed command line.
fn execute(cli: Cli, config: Config) -> Result<()> {
    let args = GenerateArgs {
        variant: cli.variant.unwrap_or_default(),
        output: cli.output,
        literal: cli.literal,
        summary: cli.summary,
    };
    run_generate(args, config)?;
    Ok(())
}
