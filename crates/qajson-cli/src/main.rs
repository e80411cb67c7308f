//! # qajson CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use qajson_cli::init::{run_init, InitArgs};
use qajson_cli::summary::{run_summary, SummaryArgs};
use qajson_cli::validate::{run_validate, ValidateArgs};
use qajson_cli::versions::run_versions;

/// QAJSON toolchain.
///
/// Validates QA result documents against their declared schema version,
/// lists available schema versions, writes minimal documents, and
/// summarises check outcomes.
#[derive(Parser, Debug)]
#[command(name = "qajson", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Directory of `v<semver>/` schema bundles to use instead of the
    /// bundled schemas.
    #[arg(long, global = true, env = "QAJSON_SCHEMA_DIR")]
    schema_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate QAJSON files against their declared schema version.
    Validate(ValidateArgs),

    /// List available schema versions.
    Versions,

    /// Write a minimal document at the latest schema version.
    Init(InitArgs),

    /// Print the checks of a document with their state and status.
    Summary(SummaryArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let validator = qajson_cli::schema_validator(cli.schema_dir.as_deref());
    tracing::debug!(source = ?validator.locator().source(), "using schema source");

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args, &validator),
        Commands::Versions => run_versions(&validator),
        Commands::Init(args) => run_init(&args, &validator),
        Commands::Summary(args) => run_summary(&args, &validator),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
