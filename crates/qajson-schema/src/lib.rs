//! # qajson-schema — Schema Bundles, Validation and Loading
//!
//! Binds QAJSON documents to the versioned JSON Schemas they declare.
//!
//! ## Components
//!
//! - [`SchemaSource`] — where bundles live. [`InMemorySchemas::bundled`]
//!   serves the schemas compiled into this crate (`schemas/v<semver>/`);
//!   [`SchemaDirectory`] reads the same layout from disk.
//! - [`SchemaLocator`] — orders bundles by semantic version, reports the
//!   latest, and resolves a document version to its [`SchemaBundle`].
//! - [`SchemaValidator`] — Draft-07 validation collecting every
//!   [`Violation`].
//! - [`QajsonParser`] — text/bytes/file → validated `qajson_core::Root`.
//! - [`minimal_document`] — an empty document at the latest version.
//!
//! ## Crate Policy
//!
//! - Depends only on `qajson-core` internally.
//! - There is no global locator: construct one and pass it in.
//! - A broken bundle is a [`SchemaError::Definition`], never a
//!   validation failure of the user's document.

pub mod builder;
pub mod error;
pub mod locator;
pub mod parser;
pub mod source;
pub mod validate;

pub use builder::minimal_document;
pub use error::{LoadError, SchemaError};
pub use locator::{SchemaBundle, SchemaLocator, ROOT_SCHEMA_FILE};
pub use parser::QajsonParser;
pub use source::{InMemorySchemas, SchemaDirectory, SchemaSource};
pub use validate::{SchemaValidator, ValidationViolations, Violation};
