//! # Schema Locator
//!
//! Discovers the schema bundles a [`SchemaSource`] offers, orders them by
//! semantic version and resolves a document's `qa.version` to its bundle.
//!
//! ## Ordering
//!
//! Bundles are sorted by parsed version, never by name: `v0.1.10` sorts
//! after `v0.1.9`. The last schema path is always the newest version.
//!
//! ## Caching
//!
//! The source is scanned on first use and the result (including a
//! failure) is kept for the locator's lifetime in a `OnceLock`, so
//! concurrent first calls scan at most once. Bundle contents are read on
//! each [`SchemaLocator::resolve`].

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use semver::Version;
use serde_json::Value;

use crate::error::SchemaError;
use crate::source::{InMemorySchemas, SchemaDirectory, SchemaSource};

/// File name of the entry schema inside every bundle.
pub const ROOT_SCHEMA_FILE: &str = "qajson.schema.json";

#[derive(Debug, Clone, PartialEq, Eq)]
struct BundleEntry {
    version: Version,
    name: String,
    path: PathBuf,
}

/// All schema documents of one version, parsed.
#[derive(Debug, Clone)]
pub struct SchemaBundle {
    version: Version,
    name: String,
    root: Value,
    documents: BTreeMap<String, Value>,
}

impl SchemaBundle {
    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Bundle name, e.g. `v0.1.4`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The entry schema ([`ROOT_SCHEMA_FILE`]).
    pub fn root_schema(&self) -> &Value {
        &self.root
    }

    /// Every document in the bundle, root included, by file name.
    pub fn documents(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.documents.iter().map(|(name, value)| (name.as_str(), value))
    }
}

/// Index of available schema versions over an injected source.
pub struct SchemaLocator {
    source: Box<dyn SchemaSource>,
    index: OnceLock<Result<Vec<BundleEntry>, SchemaError>>,
}

impl fmt::Debug for SchemaLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaLocator")
            .field("source", &self.source)
            .field("scanned", &self.index.get().is_some())
            .finish()
    }
}

impl SchemaLocator {
    pub fn new(source: impl SchemaSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            index: OnceLock::new(),
        }
    }

    /// Locator over the schemas compiled into this crate.
    pub fn bundled() -> Self {
        Self::new(InMemorySchemas::bundled())
    }

    /// Locator over a directory of `v<semver>/` bundles.
    pub fn from_dir(path: impl Into<PathBuf>) -> Self {
        Self::new(SchemaDirectory::new(path))
    }

    pub fn source(&self) -> &dyn SchemaSource {
        self.source.as_ref()
    }

    /// Root schema locations, ascending by version.
    pub fn schema_paths(&self) -> Result<Vec<PathBuf>, SchemaError> {
        Ok(self.index()?.iter().map(|e| e.path.clone()).collect())
    }

    /// Available versions without the `v` marker, ascending.
    pub fn versions(&self) -> Result<Vec<String>, SchemaError> {
        Ok(self.index()?.iter().map(|e| e.version.to_string()).collect())
    }

    /// The newest available version, e.g. `"0.1.4"`.
    ///
    /// # Errors
    ///
    /// [`SchemaError::NotFound`] when the source holds no bundles.
    pub fn latest_version(&self) -> Result<String, SchemaError> {
        let paths = self.schema_paths()?;
        let latest = paths.last().ok_or_else(|| SchemaError::NotFound {
            location: self.source.location().display().to_string(),
        })?;

        // The containing directory names the version, e.g. "v0.1.4".
        let dir_name = latest
            .parent()
            .and_then(Path::file_name)
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        dir_name
            .strip_prefix('v')
            .map(str::to_string)
            .ok_or_else(|| SchemaError::Definition {
                schema_name: latest.display().to_string(),
                reason: "bundle directory is not named v<version>".to_string(),
            })
    }

    /// Load the bundle for `version`. Accepts `"0.1.4"` or `"v0.1.4"`.
    ///
    /// # Errors
    ///
    /// [`SchemaError::UnknownVersion`] if no bundle matches, or
    /// [`SchemaError::Definition`] if a document in the bundle is not
    /// valid JSON.
    pub fn resolve(&self, version: &str) -> Result<SchemaBundle, SchemaError> {
        let entries = self.index()?;
        let entry = parse_version(version)
            .and_then(|wanted| entries.iter().find(|e| e.version == wanted))
            .ok_or_else(|| SchemaError::UnknownVersion {
                requested: version.to_string(),
                known: entries.iter().map(|e| e.version.to_string()).collect(),
            })?;

        let mut documents = BTreeMap::new();
        for (file, text) in self.source.read_bundle(&entry.name)? {
            let value: Value =
                serde_json::from_str(&text).map_err(|e| SchemaError::Definition {
                    schema_name: format!("{}/{file}", entry.name),
                    reason: format!("invalid JSON: {e}"),
                })?;
            documents.insert(file, value);
        }

        let root = documents
            .get(ROOT_SCHEMA_FILE)
            .cloned()
            .ok_or_else(|| SchemaError::Definition {
                schema_name: format!("{}/{ROOT_SCHEMA_FILE}", entry.name),
                reason: "root schema missing from bundle".to_string(),
            })?;

        tracing::debug!(
            bundle = %entry.name,
            documents = documents.len(),
            "resolved schema bundle"
        );

        Ok(SchemaBundle {
            version: entry.version.clone(),
            name: entry.name.clone(),
            root,
            documents,
        })
    }

    fn index(&self) -> Result<&[BundleEntry], SchemaError> {
        self.index
            .get_or_init(|| self.scan())
            .as_deref()
            .map_err(|e| e.clone())
    }

    fn scan(&self) -> Result<Vec<BundleEntry>, SchemaError> {
        let location = self.source.location();
        let mut entries = Vec::new();

        for name in self.source.bundle_names()? {
            let Some(version) = name.strip_prefix('v').and_then(|v| Version::parse(v).ok()) else {
                tracing::warn!(bundle = %name, "skipping schema directory not named v<semver>");
                continue;
            };
            if !self.source.has_document(&name, ROOT_SCHEMA_FILE) {
                tracing::warn!(bundle = %name, "skipping schema bundle without {ROOT_SCHEMA_FILE}");
                continue;
            }
            let path = location.join(&name).join(ROOT_SCHEMA_FILE);
            entries.push(BundleEntry {
                version,
                name,
                path,
            });
        }

        entries.sort_by(|a, b| a.version.cmp(&b.version));
        tracing::debug!(
            location = %location.display(),
            bundles = entries.len(),
            "indexed schema bundles"
        );
        Ok(entries)
    }
}

fn parse_version(version: &str) -> Option<Version> {
    let bare = version.strip_prefix('v').unwrap_or(version);
    Version::parse(bare).ok()
}
