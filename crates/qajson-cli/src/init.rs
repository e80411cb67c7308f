//! # Init Subcommand
//!
//! Writes the smallest valid document at the newest schema version, as a
//! starting point for check engines that populate results incrementally.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use qajson_core::{DataLevelName, Root};
use qajson_schema::{minimal_document, SchemaValidator};

/// Arguments for the `qajson init` subcommand.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Write to this file instead of stdout.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Include an empty `chart_adequacy` data level.
    #[arg(long)]
    pub chart_adequacy: bool,
}

/// Execute the init subcommand.
pub fn run_init(args: &InitArgs, validator: &SchemaValidator) -> Result<u8> {
    let root = build_document(args, validator)?;
    let text = root
        .to_json_string_pretty()
        .context("failed to serialize document")?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, format!("{text}\n"))
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), version = %root.qa.version, "wrote QAJSON document");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{text}")?;
        }
    }
    Ok(0)
}

fn build_document(args: &InitArgs, validator: &SchemaValidator) -> Result<Root> {
    let mut root =
        minimal_document(validator.locator()).context("cannot determine latest schema version")?;
    if args.chart_adequacy {
        root.qa.get_or_add_data_level(DataLevelName::ChartAdequacy);
    }
    validator
        .validate_root(&root)
        .context("generated document does not validate")?;
    Ok(root)
}
