//! # Versions Subcommand

use std::io::Write;

use anyhow::{Context, Result};

use qajson_schema::SchemaValidator;

/// Print every available schema version, oldest first, marking the newest.
pub fn run_versions(validator: &SchemaValidator) -> Result<u8> {
    let stdout = std::io::stdout();
    write_versions(validator, &mut stdout.lock())?;
    Ok(0)
}

fn write_versions(validator: &SchemaValidator, out: &mut impl Write) -> Result<()> {
    let locator = validator.locator();
    let source = locator.source().location().display().to_string();
    let latest = locator
        .latest_version()
        .with_context(|| format!("no schema versions available from {source}"))?;

    for version in locator.versions()? {
        if version == latest {
            writeln!(out, "{version} (latest)")?;
        } else {
            writeln!(out, "{version}")?;
        }
    }
    Ok(())
}
