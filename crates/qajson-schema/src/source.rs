//! # Schema Sources
//!
//! Where schema bundles come from. The locator only sees the
//! [`SchemaSource`] trait, so the bundled set, an on-disk directory and
//! test fixtures are interchangeable.
//!
//! A source holds bundles named `v<major>.<minor>.<patch>`, each a flat
//! set of `*.json` schema documents.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::SchemaError;

/// Provider of schema bundles.
pub trait SchemaSource: fmt::Debug + Send + Sync {
    /// Base location; schema paths are reported relative to it.
    fn location(&self) -> &Path;

    /// Names of all candidate bundles, in any order.
    fn bundle_names(&self) -> Result<Vec<String>, SchemaError>;

    /// Whether `bundle` contains a document named `file`.
    fn has_document(&self, bundle: &str, file: &str) -> bool;

    /// All documents of `bundle` as `(file name, JSON text)`, sorted by
    /// file name.
    fn read_bundle(&self, bundle: &str) -> Result<Vec<(String, String)>, SchemaError>;
}

/// Bundles stored as subdirectories of a filesystem directory.
#[derive(Debug, Clone)]
pub struct SchemaDirectory {
    root: PathBuf,
}

impl SchemaDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SchemaSource for SchemaDirectory {
    fn location(&self) -> &Path {
        &self.root
    }

    fn bundle_names(&self) -> Result<Vec<String>, SchemaError> {
        let not_found = |e: std::io::Error| SchemaError::NotFound {
            location: format!("{} ({e})", self.root.display()),
        };

        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.root).map_err(not_found)? {
            let path = entry.map_err(not_found)?.path();
            if !path.is_dir() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }

    fn has_document(&self, bundle: &str, file: &str) -> bool {
        self.root.join(bundle).join(file).is_file()
    }

    fn read_bundle(&self, bundle: &str) -> Result<Vec<(String, String)>, SchemaError> {
        let dir = self.root.join(bundle);
        let unreadable = |path: &Path, e: std::io::Error| SchemaError::Definition {
            schema_name: path.display().to_string(),
            reason: format!("cannot read: {e}"),
        };

        let mut documents = Vec::new();
        for entry in std::fs::read_dir(&dir).map_err(|e| unreadable(&dir, e))? {
            let path = entry.map_err(|e| unreadable(&dir, e))?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !path.is_file() || !name.ends_with(".json") {
                continue;
            }
            let text = std::fs::read_to_string(&path).map_err(|e| unreadable(&path, e))?;
            documents.push((name.to_string(), text));
        }
        documents.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(documents)
    }
}

/// Schema documents held in memory. Backs the bundled schema set and
/// lets tests build bundles without touching the filesystem.
#[derive(Debug, Clone)]
pub struct InMemorySchemas {
    location: PathBuf,
    bundles: BTreeMap<String, BTreeMap<String, String>>,
}

/// Schema documents compiled into the crate: `(bundle, file, text)`.
const BUNDLED: &[(&str, &str, &str)] = &[
    (
        "v0.1.4",
        "qajson.schema.json",
        include_str!("../schemas/v0.1.4/qajson.schema.json"),
    ),
    (
        "v0.1.4",
        "check.schema.json",
        include_str!("../schemas/v0.1.4/check.schema.json"),
    ),
];

impl InMemorySchemas {
    /// An empty source reported under `location`.
    pub fn new(location: impl Into<PathBuf>) -> Self {
        Self {
            location: location.into(),
            bundles: BTreeMap::new(),
        }
    }

    /// The schema bundles shipped with this crate.
    pub fn bundled() -> Self {
        BUNDLED
            .iter()
            .fold(Self::new("<bundled>"), |source, (bundle, file, text)| {
                source.with_document(*bundle, *file, *text)
            })
    }

    /// Builder form of [`InMemorySchemas::insert`].
    pub fn with_document(
        mut self,
        bundle: impl Into<String>,
        file: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        self.insert(bundle, file, text);
        self
    }

    /// Add or replace one document.
    pub fn insert(
        &mut self,
        bundle: impl Into<String>,
        file: impl Into<String>,
        text: impl Into<String>,
    ) {
        self.bundles
            .entry(bundle.into())
            .or_default()
            .insert(file.into(), text.into());
    }
}

impl SchemaSource for InMemorySchemas {
    fn location(&self) -> &Path {
        &self.location
    }

    fn bundle_names(&self) -> Result<Vec<String>, SchemaError> {
        Ok(self.bundles.keys().cloned().collect())
    }

    fn has_document(&self, bundle: &str, file: &str) -> bool {
        self.bundles
            .get(bundle)
            .is_some_and(|docs| docs.contains_key(file))
    }

    fn read_bundle(&self, bundle: &str) -> Result<Vec<(String, String)>, SchemaError> {
        self.bundles
            .get(bundle)
            .map(|docs| docs.iter().map(|(f, t)| (f.clone(), t.clone())).collect())
            .ok_or_else(|| SchemaError::NotFound {
                location: self.location.join(bundle).display().to_string(),
            })
    }
}
