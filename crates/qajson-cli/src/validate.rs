//! # Validate Subcommand
//!
//! Loads each file through the full parser (syntax, version lookup,
//! schema validation, record construction) and reports every problem
//! found, not just the first.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;

use qajson_schema::{QajsonParser, SchemaValidator};

/// Arguments for the `qajson validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// QAJSON files to validate.
    #[arg(value_name = "FILE", required = true)]
    pub paths: Vec<PathBuf>,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 if every file is valid, 1 otherwise.
pub fn run_validate(args: &ValidateArgs, validator: &SchemaValidator) -> Result<u8> {
    let stdout = std::io::stdout();
    let failed = validate_files(&args.paths, validator, &mut stdout.lock())?;
    Ok(u8::from(failed > 0))
}

/// Validate `paths` in order, writing one report block per file.
/// Returns the number of files that failed.
fn validate_files(
    paths: &[PathBuf],
    validator: &SchemaValidator,
    out: &mut impl Write,
) -> Result<usize> {
    let mut failed = 0usize;
    for path in paths {
        if !validate_one(path, validator, out)? {
            failed += 1;
        }
    }

    if paths.len() > 1 {
        writeln!(out, "\n{}/{} files valid", paths.len() - failed, paths.len())?;
    }
    Ok(failed)
}

fn validate_one(path: &Path, validator: &SchemaValidator, out: &mut impl Write) -> Result<bool> {
    match QajsonParser::open(path, validator) {
        Ok(parsed) => {
            let checks: usize = parsed
                .root()
                .qa
                .data_levels()
                .map(|(_, level)| level.checks.len())
                .sum();
            writeln!(
                out,
                "OK: {} (QAJSON v{}, {checks} checks)",
                path.display(),
                parsed.version()
            )?;
            Ok(true)
        }
        Err(e) => {
            tracing::info!(path = %path.display(), error = %e, "validation failed");
            writeln!(out, "FAIL: {}", path.display())?;
            match e.violations() {
                Some(violations) => writeln!(out, "{violations}")?,
                None => writeln!(out, "  {e}")?,
            }
            Ok(false)
        }
    }
}
