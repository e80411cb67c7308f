//! # Error Types
//!
//! Errors raised while mapping JSON values onto the record model. All
//! errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! Every error names the record type being built and the offending key,
//! so a failure deep inside a document can be traced to its field.

use thiserror::Error;

/// Error produced by the record model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A required key was absent from the input object.
    #[error("{record}: missing required field '{field}'")]
    MissingField {
        /// Record type being constructed (e.g. `"Execution"`).
        record: &'static str,
        /// Name of the absent key.
        field: String,
    },

    /// A recognised key held a JSON value of the wrong type.
    #[error("{record}.{field}: expected {expected}, found {found}")]
    InvalidType {
        /// Record type being constructed.
        record: &'static str,
        /// Key holding the bad value. Empty when the record itself is
        /// not a JSON object.
        field: String,
        /// Expected JSON type.
        expected: &'static str,
        /// JSON type actually found.
        found: &'static str,
    },

    /// A number JSON cannot represent (NaN or an infinity).
    #[error("{record}.{field}: value is not a finite number")]
    NonFiniteNumber {
        /// Record type being modified.
        record: &'static str,
        /// Field the value was meant for.
        field: String,
    },

    /// A data level name outside `raw_data`, `survey_products` and
    /// `chart_adequacy`.
    #[error("unknown data level '{0}'")]
    UnknownDataLevel(String),

    /// A timestamp string could not be parsed.
    #[error("invalid timestamp {value:?}: {reason}")]
    InvalidTimestamp {
        /// The rejected input.
        value: String,
        /// Parser message.
        reason: String,
    },
}

impl ModelError {
    /// Name of the field the error refers to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingField { field, .. }
            | Self::InvalidType { field, .. }
            | Self::NonFiniteNumber { field, .. } => Some(field),
            Self::UnknownDataLevel(_) | Self::InvalidTimestamp { .. } => None,
        }
    }
}
