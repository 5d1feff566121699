//! Tether CLI - Command-line interface for Tether scene manifests
//!
//! This CLI lets developers check a scene before shipping it:
//! - Resolve every host's slots at design time or run time
//! - List the slots each host type declares
//! - Inspect the tree, including nodes queued for destruction

use clap::{Parser, Subcommand, ValueEnum};
use std::ffi::OsString;
use std::path::PathBuf;
use tether_types::ExecutionMode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod error;
mod manifest;
mod output;

pub use error::{CliError, CliResult};
pub use manifest::Manifest;
pub use output::{print_error, OutputFormat};

/// Tether CLI application
#[derive(Parser)]
#[command(name = "tether")]
#[command(about = "Tether - bind host slots to scene tree nodes", long_about = None)]
#[command(version)]
struct Cli {
    /// Output format (table, json, yaml)
    #[arg(short, long, default_value = "table", global = true)]
    output: OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Execution mode as given on the command line
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum ModeArg {
    /// Log failures and keep going
    #[default]
    Design,
    /// Abort on the first host with failures
    Run,
}

impl From<ModeArg> for ExecutionMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Design => ExecutionMode::DesignTime,
            ModeArg::Run => ExecutionMode::RunTime,
        }
    }
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Resolve the slots of every host in a manifest
    Resolve {
        /// Manifest file (YAML, or JSON with a .json extension)
        manifest: PathBuf,
        /// Execution mode
        #[arg(short, long, default_value = "design")]
        mode: ModeArg,
    },

    /// List the slots declared per host type
    Slots {
        /// Manifest file
        manifest: PathBuf,
    },

    /// Print the scene tree
    Tree {
        /// Manifest file
        manifest: PathBuf,
    },
}

/// Run using the current process arguments.
pub fn run() -> CliResult<()> {
    run_with_args(std::env::args_os())
}

/// Run using the provided argument iterator.
pub fn run_with_args<I, T>(args: I) -> CliResult<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    // Logs go to stderr, stdout carries only command output
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        Commands::Resolve { manifest, mode } => {
            commands::resolve::execute(&manifest, mode.into(), cli.output)
        }
        Commands::Slots { manifest } => commands::slots::execute(&manifest, cli.output),
        Commands::Tree { manifest } => commands::tree::execute(&manifest, cli.output),
    }
}
