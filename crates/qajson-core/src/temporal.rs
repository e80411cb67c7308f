//! # Execution Timestamps
//!
//! `Timestamp` is the UTC, second-precision instant check engines write
//! into `Execution::start` and `Execution::end`. Documents store the
//! rendered string, so the model itself never requires a parse; this type
//! only exists for code that produces or measures executions.
//!
//! Rendering is always `YYYY-MM-DDTHH:MM:SSZ`, which satisfies the
//! `date-time` format of the bundled schemas.

use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// A UTC timestamp truncated to seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Current UTC time, truncated.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// From a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse an RFC 3339 string with any offset, converting to UTC.
    ///
    /// Documents written by other tools commonly carry milliseconds or a
    /// local offset; both are accepted and normalised.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidTimestamp`] if `s` is not RFC 3339.
    pub fn parse(s: &str) -> Result<Self, ModelError> {
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| ModelError::InvalidTimestamp {
            value: s.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Signed duration from `self` to `later`.
    pub fn until(&self, later: &Timestamp) -> Duration {
        later.0 - self.0
    }

    /// Render as ISO 8601 with Z suffix (e.g. `2026-01-15T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl From<Timestamp> for String {
    fn from(ts: Timestamp) -> Self {
        ts.to_iso8601()
    }
}

fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}
