//! # qajson-core — QAJSON Record Model
//!
//! Typed in-memory representation of a QAJSON document: the quality
//! assurance checks run over hydrographic survey data, their inputs and
//! parameters, and their outputs.
//!
//! ```text
//! Root
//! └── Qa (version)
//!     ├── raw_data:        DataLevel
//!     ├── survey_products: DataLevel
//!     └── chart_adequacy:  DataLevel?
//!         └── checks: [Check { info, inputs?, outputs? }]
//! ```
//!
//! ## Key Design Principles
//!
//! 1. **One mapping pattern.** Every record implements [`Record`]:
//!    `from_json` reads required keys (failing with
//!    [`ModelError::MissingField`]) and binds optional keys to `None` when
//!    absent; `to_json` always emits required keys and emits an optional
//!    key only when it is `Some`. `to_json(from_json(d)) == d` for any
//!    document holding only recognised keys. Unknown keys are dropped.
//!
//! 2. **Schema-open payloads stay untyped.** `Param::value`,
//!    `Param::options` and `Outputs::data` are `serde_json::Value`s.
//!
//! 3. **No stringly-typed slot access.** Data levels are addressed
//!    through [`DataLevelName`], never by field name.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `qajson-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Schema versions are not checked here; see `qajson-schema`.

pub mod check;
pub mod document;
pub mod error;
pub mod execution;
pub mod record;
pub mod temporal;

pub use check::{Check, File, Group, Info, Inputs, Outputs, Param};
pub use document::{DataLevel, DataLevelName, Qa, Root};
pub use error::ModelError;
pub use execution::Execution;
pub use record::Record;
pub use temporal::Timestamp;
