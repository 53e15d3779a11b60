//! mdfmt CLI - Canonical markdown formatter.
//!
//! Provides commands for:
//! - `format`: Print or rewrite markdown in canonical form
//! - `check`: Fail when files are not in canonical form

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CheckArgs, FormatArgs};
use output::Output;

/// mdfmt - Canonical markdown formatter.
#[derive(Parser)]
#[command(name = "mdfmt", version, about)]
struct Cli {
    /// Enable verbose output (show configuration and skipped files).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Format markdown files, or stdin when no file is given.
    Format(FormatArgs),
    /// Check that markdown files are already formatted.
    Check(CheckArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Format(args) => args.execute(),
        Commands::Check(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
