//! # Check Execution Record
//!
//! `Execution` reports whether and how a check ran. It is the one
//! mandatory part of `Outputs`, and `status` is its one mandatory field.
//!
//! Status values are open strings; the constants in [`status`] are the
//! ones check engines emit, but any string round-trips unchanged.

use chrono::Duration;
use serde_json::Value;

use crate::error::ModelError;
use crate::record::{record_serde, Dict, Fields, Record};
use crate::temporal::Timestamp;

/// Status strings written by check engines.
pub mod status {
    pub const DRAFT: &str = "draft";
    pub const QUEUED: &str = "queued";
    pub const RUNNING: &str = "running";
    pub const COMPLETED: &str = "completed";
    pub const FAILED: &str = "failed";
    pub const ABORTED: &str = "aborted";
}

/// Execution state of a single check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    pub status: String,
    /// ISO 8601 start time.
    pub start: Option<String>,
    /// ISO 8601 end time.
    pub end: Option<String>,
    pub error: Option<String>,
}

impl Execution {
    /// An execution with only a status.
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            start: None,
            end: None,
            error: None,
        }
    }

    /// A `running` execution that began at `at`.
    pub fn started(at: Timestamp) -> Self {
        Self {
            start: Some(at.to_iso8601()),
            ..Self::new(status::RUNNING)
        }
    }

    /// Record the end of the run with a final status.
    pub fn finish(&mut self, status: impl Into<String>, at: Timestamp) {
        self.status = status.into();
        self.end = Some(at.to_iso8601());
    }

    /// Record a failed run with its error message.
    pub fn fail(&mut self, error: impl Into<String>, at: Timestamp) {
        self.finish(status::FAILED, at);
        self.error = Some(error.into());
    }

    /// Wall-clock duration of the run, when both ends are recorded.
    ///
    /// # Errors
    ///
    /// [`ModelError::InvalidTimestamp`] if either stored time is not
    /// RFC 3339.
    pub fn duration(&self) -> Result<Option<Duration>, ModelError> {
        match (&self.start, &self.end) {
            (Some(start), Some(end)) => {
                let start = Timestamp::parse(start)?;
                let end = Timestamp::parse(end)?;
                Ok(Some(start.until(&end)))
            }
            _ => Ok(None),
        }
    }
}

impl Record for Execution {
    const NAME: &'static str = "Execution";

    fn from_json(value: &Value) -> Result<Self, ModelError> {
        let f = Fields::of(Self::NAME, value)?;
        Ok(Self {
            status: f.string("status")?,
            start: f.opt_string("start")?,
            end: f.opt_string("end")?,
            error: f.opt_string("error")?,
        })
    }

    fn to_json(&self) -> Value {
        Dict::new()
            .field("status", self.status.clone())
            .optional("start", self.start.clone())
            .optional("end", self.end.clone())
            .optional("error", self.error.clone())
            .build()
    }
}

record_serde!(Execution);
