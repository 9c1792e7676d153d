//! Structured configuration issues.
//!
//! Configuration sources report problems as [`ConfigIssue`]s instead of
//! failing on the first one, so that every problem of a file can be shown at
//! once. [`Severity::Error`] aborts start-up, [`Severity::Warning`] is logged
//! and the offending value falls back to its default.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// A string field does not name one of the accepted values.
    InvalidEnumValue {
        field: String,
        value: String,
        valid_values: Vec<String>,
    },
    /// A numeric field lies outside its accepted range.
    OutOfRange { field: String, value: String },
    /// Two fields contradict each other (e.g. `min_answers > max_answers`).
    InvalidConstraint { field: String },
    /// A field is accepted for compatibility but has no effect.
    Unused { field: String },
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}
