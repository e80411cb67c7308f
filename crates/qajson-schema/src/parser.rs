//! # QAJSON Parser
//!
//! Turns a file, text or bytes into a validated [`Root`]. Construction is
//! atomic: a [`QajsonParser`] either holds a fully materialised tree or
//! was never built.
//!
//! Stages, in order, each with its own error:
//!
//! 1. JSON syntax → [`LoadError::MalformedJson`]
//! 2. `qa.version` present → [`LoadError::MissingVersion`]
//! 3. bundle for that version exists → [`SchemaError::UnknownVersion`]
//! 4. document conforms → [`SchemaError::ValidationFailed`]
//! 5. record construction → [`LoadError::Model`]
//!
//! Required fields are enforced at stage 4; the record model re-checks
//! them independently at stage 5.
//!
//! [`SchemaError::UnknownVersion`]: crate::SchemaError::UnknownVersion
//! [`SchemaError::ValidationFailed`]: crate::SchemaError::ValidationFailed

use std::path::Path;

use qajson_core::{Record, Root};
use serde_json::Value;

use crate::error::LoadError;
use crate::validate::SchemaValidator;

/// A parsed and validated QAJSON document.
#[derive(Debug, Clone)]
pub struct QajsonParser {
    root: Root,
}

impl QajsonParser {
    /// Load and validate the document at `path`.
    pub fn open(path: impl AsRef<Path>, validator: &SchemaValidator) -> Result<Self, LoadError> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading QAJSON document");
        let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse_slice(&bytes, validator)
    }

    /// Parse and validate JSON text.
    pub fn parse_str(text: &str, validator: &SchemaValidator) -> Result<Self, LoadError> {
        let value: Value = serde_json::from_str(text)?;
        Self::parse_value(&value, validator)
    }

    /// Parse and validate JSON bytes.
    pub fn parse_slice(bytes: &[u8], validator: &SchemaValidator) -> Result<Self, LoadError> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::parse_value(&value, validator)
    }

    /// Validate an already-parsed JSON value and materialise it.
    pub fn parse_value(value: &Value, validator: &SchemaValidator) -> Result<Self, LoadError> {
        let version = document_version(value).ok_or(LoadError::MissingVersion)?;
        validator.validate(value, version)?;
        let root = Root::from_json(value)?;
        tracing::debug!(
            version,
            checks = root.qa.data_levels().map(|(_, l)| l.checks.len()).sum::<usize>(),
            "materialised QAJSON document"
        );
        Ok(Self { root })
    }

    pub fn root(&self) -> &Root {
        &self.root
    }

    pub fn into_root(self) -> Root {
        self.root
    }

    /// Schema version the document declared.
    pub fn version(&self) -> &str {
        &self.root.qa.version
    }
}

/// `qa.version`, read without validating anything else.
fn document_version(value: &Value) -> Option<&str> {
    value.get("qa")?.get("version")?.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_version() {
        assert_eq!(document_version(&json!({"qa": {"version": "0.1.4"}})), Some("0.1.4"));
        assert_eq!(document_version(&json!({"qa": {}})), None);
        assert_eq!(document_version(&json!({"qa": {"version": 4}})), None);
        assert_eq!(document_version(&json!([])), None);
    }

    #[test]
    fn test_minimal_text_parses() {
        let validator = SchemaValidator::bundled();
        let text = r#"{"qa": {"version": "0.1.4", "raw_data": {"checks": []}, "survey_products": {"checks": []}}}"#;
        let parsed = QajsonParser::parse_str(text, &validator).unwrap();
        assert_eq!(parsed.version(), "0.1.4");
        assert_eq!(parsed.into_root(), Root::minimal("0.1.4"));
    }

    #[test]
    fn test_open_missing_file() {
        let validator = SchemaValidator::bundled();
        let err = QajsonParser::open("/definitely/not/here.json", &validator).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
