//! # qajson-cli — Command-Line Interface for QAJSON
//!
//! Provides the `qajson` binary.
//!
//! ## Subcommands
//!
//! - `qajson validate <FILE>...` — Schema validation with every violation listed.
//! - `qajson versions` — Available schema versions, newest marked.
//! - `qajson init` — Minimal document at the latest version.
//! - `qajson summary <FILE>` — Checks per data level with state and status.
//!
//! ```bash
//! qajson validate survey/qa.json
//! qajson --schema-dir ./schemas versions
//! qajson init --chart-adequacy --output qa.json
//! ```
//!
//! Handlers return an exit code: 0 on success, 1 on failure. Argument
//! parsing stays in `main.rs`; the logic lives in the domain crates.

pub mod init;
pub mod summary;
pub mod validate;
pub mod versions;

use std::path::Path;

use qajson_schema::{SchemaLocator, SchemaValidator};

/// Validator over `schema_dir` when given, otherwise the bundled schemas.
pub fn schema_validator(schema_dir: Option<&Path>) -> SchemaValidator {
    let locator = match schema_dir {
        Some(dir) => SchemaLocator::from_dir(dir),
        None => SchemaLocator::bundled(),
    };
    SchemaValidator::new(locator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_validator_uses_bundled_schemas() {
        let validator = schema_validator(None);
        assert_eq!(validator.locator().latest_version().unwrap(), "0.1.4");
    }

    #[test]
    fn schema_dir_overrides_bundled_schemas() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = dir.path().join("v2.0.0");
        std::fs::create_dir(&bundle).unwrap();
        std::fs::write(bundle.join(qajson_schema::ROOT_SCHEMA_FILE), "{}").unwrap();

        let validator = schema_validator(Some(dir.path()));
        assert_eq!(validator.locator().versions().unwrap(), vec!["2.0.0"]);
    }
}
