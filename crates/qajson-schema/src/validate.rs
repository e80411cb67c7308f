//! # Schema Validation
//!
//! Validates raw QAJSON values against the bundle for their version
//! (JSON Schema Draft-07, including `format` checks).
//!
//! ## Reporting
//!
//! Validation never stops at the first problem. Every violation is
//! collected with the JSON Pointer of the offending value, the schema
//! keyword that rejected it, and a readable message, so a caller can
//! report all issues in one pass.
//!
//! ## Schema Resolution
//!
//! Cross-document `$ref`s (`check.schema.json#/definitions/check`) are
//! served from the bundle's own documents by [`LocalSchemaRetriever`],
//! matched first by `$id` and then by file name. No network requests are
//! made. A reference the bundle cannot satisfy is a
//! [`SchemaError::Definition`], as is any schema that fails to compile.

use std::collections::HashMap;
use std::fmt;

use jsonschema::{Retrieve, Uri, Validator};
use qajson_core::{Record, Root};
use serde_json::Value;

use crate::error::SchemaError;
use crate::locator::{SchemaBundle, SchemaLocator, ROOT_SCHEMA_FILE};

/// Resolves `$ref` URIs to documents of a single bundle.
struct LocalSchemaRetriever {
    /// Map from `$id` URI or bare file name to schema value.
    schemas_by_uri: HashMap<String, Value>,
}

impl LocalSchemaRetriever {
    fn for_bundle(bundle: &SchemaBundle) -> Self {
        let mut schemas_by_uri = HashMap::new();
        for (file, value) in bundle.documents() {
            if let Some(id) = value.get("$id").and_then(Value::as_str) {
                schemas_by_uri.insert(id.to_string(), value.clone());
            }
            schemas_by_uri.insert(file.to_string(), value.clone());
        }
        Self { schemas_by_uri }
    }
}

impl Retrieve for LocalSchemaRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();

        if let Some(value) = self.schemas_by_uri.get(uri_str) {
            return Ok(value.clone());
        }

        // Relative refs from a schema without `$id` resolve against a
        // placeholder base; fall back to the file name.
        let filename = uri_str.rsplit('/').next().unwrap_or(uri_str);
        self.schemas_by_uri
            .get(filename)
            .cloned()
            .ok_or_else(|| format!("schema not found in bundle for URI: {uri_str}").into())
    }
}

/// A single validation violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer to the violating value in the document.
    pub instance_path: String,
    /// JSON Pointer to the schema keyword that failed.
    pub schema_path: String,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "  (root): {}", self.message)
        } else {
            write!(f, "  {}: {}", self.instance_path, self.message)
        }
    }
}

/// Every violation found in one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.violations.iter()
    }

    /// True if some violation sits at `instance_path`.
    pub fn has_path(&self, instance_path: &str) -> bool {
        self.violations.iter().any(|v| v.instance_path == instance_path)
    }

    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }
}

impl<'a> IntoIterator for &'a ValidationViolations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.iter()
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// Validates QAJSON documents against the bundles of a [`SchemaLocator`].
///
/// `Send + Sync`; share one instance across threads.
#[derive(Debug)]
pub struct SchemaValidator {
    locator: SchemaLocator,
}

impl SchemaValidator {
    pub fn new(locator: SchemaLocator) -> Self {
        Self { locator }
    }

    /// Validator over the bundled schemas.
    pub fn bundled() -> Self {
        Self::new(SchemaLocator::bundled())
    }

    pub fn locator(&self) -> &SchemaLocator {
        &self.locator
    }

    /// Compile the root schema of `version`.
    ///
    /// # Errors
    ///
    /// [`SchemaError::UnknownVersion`] if no bundle matches,
    /// [`SchemaError::Definition`] if the bundle does not compile.
    pub fn build_validator(&self, version: &str) -> Result<Validator, SchemaError> {
        let bundle = self.locator.resolve(version)?;
        compile(&bundle)
    }

    /// Validate a raw document against the bundle for `version`.
    ///
    /// # Errors
    ///
    /// [`SchemaError::ValidationFailed`] carrying every violation, plus
    /// the errors of [`SchemaValidator::build_validator`].
    pub fn validate(&self, instance: &Value, version: &str) -> Result<(), SchemaError> {
        let bundle = self.locator.resolve(version)?;
        let validator = compile(&bundle)?;

        let violations: Vec<Violation> = validator
            .iter_errors(instance)
            .map(|e| Violation {
                instance_path: e.instance_path.to_string(),
                schema_path: e.schema_path.to_string(),
                message: e.to_string(),
            })
            .collect();

        if violations.is_empty() {
            tracing::debug!(version = %bundle.version(), "document valid");
            Ok(())
        } else {
            tracing::debug!(
                version = %bundle.version(),
                violations = violations.len(),
                "document failed validation"
            );
            Err(SchemaError::ValidationFailed {
                version: bundle.version().to_string(),
                violations: ValidationViolations::new(violations),
            })
        }
    }

    /// Validate an in-memory tree against the version it declares.
    pub fn validate_root(&self, root: &Root) -> Result<(), SchemaError> {
        self.validate(&root.to_json(), &root.qa.version)
    }
}

fn compile(bundle: &SchemaBundle) -> Result<Validator, SchemaError> {
    jsonschema::options()
        .with_draft(jsonschema::Draft::Draft7)
        .should_validate_formats(true)
        .with_retriever(LocalSchemaRetriever::for_bundle(bundle))
        .build(bundle.root_schema())
        .map_err(|e| SchemaError::Definition {
            schema_name: format!("{}/{ROOT_SCHEMA_FILE}", bundle.name()),
            reason: e.to_string(),
        })
}
