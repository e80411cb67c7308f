//! # Error Types
//!
//! [`SchemaError`] covers bundle discovery, bundle integrity and document
//! validation. [`LoadError`] is what the parser returns: everything that
//! can go wrong between raw bytes and a materialised `Root`.
//!
//! Each failure path has its own variant; none are retried, since all are
//! deterministic for a fixed input.

use qajson_core::ModelError;
use thiserror::Error;

use crate::validate::ValidationViolations;

/// Error from the schema locator or validator.
///
/// `Clone` so a failed bundle scan can be cached alongside a successful
/// one.
#[derive(Error, Debug, Clone)]
pub enum SchemaError {
    /// No schema bundles exist at the configured location.
    #[error("no schema bundles found at {location}")]
    NotFound {
        /// Directory or source description that was scanned.
        location: String,
    },

    /// The document names a version with no matching bundle.
    #[error("unknown schema version '{requested}' (known: {})", .known.join(", "))]
    UnknownVersion {
        /// Version as written in the document.
        requested: String,
        /// Available versions, ascending.
        known: Vec<String>,
    },

    /// A bundled schema is itself broken. Indicates a packaging fault,
    /// not bad user data.
    #[error("schema definition error in '{schema_name}': {reason}")]
    Definition {
        /// Bundle-relative schema file, e.g. `v0.1.4/check.schema.json`.
        schema_name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The document does not conform to its schema version.
    #[error("document does not conform to QAJSON v{version}:\n{violations}")]
    ValidationFailed {
        /// Version validated against.
        version: String,
        /// Every violation found.
        violations: ValidationViolations,
    },
}

impl SchemaError {
    /// The validation report, if this is a validation failure.
    pub fn violations(&self) -> Option<&ValidationViolations> {
        match self {
            Self::ValidationFailed { violations, .. } => Some(violations),
            _ => None,
        }
    }
}

/// Error loading a QAJSON document.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The source could not be read.
    #[error("cannot read '{path}': {source}")]
    Io {
        /// Path that failed to read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The input is not valid JSON.
    #[error("malformed JSON at line {line}, column {column}: {message}")]
    MalformedJson {
        /// 1-based line of the syntax error.
        line: usize,
        /// 1-based column of the syntax error.
        column: usize,
        /// Parser message.
        message: String,
    },

    /// The document has no string `qa.version`.
    #[error("document has no 'qa.version'")]
    MissingVersion,

    /// Version resolution or validation failed.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The record model rejected the validated document.
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl LoadError {
    /// The validation report, if loading stopped at validation.
    pub fn violations(&self) -> Option<&ValidationViolations> {
        match self {
            Self::Schema(e) => e.violations(),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(e: serde_json::Error) -> Self {
        Self::MalformedJson {
            line: e.line(),
            column: e.column(),
            message: e.to_string(),
        }
    }
}
