//! # Error Hierarchy
//!
//! Four layers with different blast radius:
//!
//! - [`ResultError`]: misuse of the result aggregator (unknown checker or issue).
//! - [`RuleError`]: a failure inside one rule body. The driver records it as
//!   `ERROR` for that rule and carries on.
//! - [`DriverError`]: a configuration defect of the pipeline. It aborts the run.
//! - [`ReportError`]: writing the report failed.

use thiserror::Error;

use omqc_core::ValidationError;
use omqc_schema::SchemaError;

/// Misuse of [`BundleResult`](crate::result::BundleResult).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResultError {
    /// No checker with this id has been registered.
    #[error("checker not registered: {checker_id}")]
    UnknownChecker {
        /// The checker id that was looked up.
        checker_id: String,
    },

    /// No issue with this id has been registered.
    #[error("issue not registered: #{issue_id}")]
    UnknownIssue {
        /// The issue id that was looked up.
        issue_id: usize,
    },

    /// `PENDING` can only be the initial status.
    #[error("cannot set status PENDING on registered checker {checker_id}")]
    PendingNotTerminal {
        /// The checker whose status was being set.
        checker_id: String,
    },
}

/// A failure inside a rule body.
#[derive(Error, Debug)]
pub enum RuleError {
    /// The rule needs the parsed document, but parsing did not succeed.
    #[error("document {path} is not available as JSON: {reason}")]
    DocumentNotParsed {
        /// Path of the input document.
        path: String,
        /// Why no parsed value exists.
        reason: String,
    },

    /// Schema resolution or compilation failed.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The rule misused the result aggregator.
    #[error(transparent)]
    Result(#[from] ResultError),

    /// Filesystem access failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Free-form failure.
    #[error("{0}")]
    Failed(String),
}

/// A pipeline configuration defect. Aborts the whole run.
#[derive(Error, Debug)]
pub enum DriverError {
    /// The rule UID does not have four segments.
    #[error("checker {checker_id} has an invalid rule uid: {source}")]
    InvalidRuleUid {
        /// The offending checker.
        checker_id: String,
        /// Parse failure.
        source: ValidationError,
    },

    /// The version gate segment of the rule UID is not a version.
    #[error("checker {checker_id} has an invalid version gate: {source}")]
    InvalidVersionGate {
        /// The offending checker.
        checker_id: String,
        /// Parse failure.
        source: ValidationError,
    },

    /// A precondition names a checker that has not run yet.
    #[error("checker {checker_id} depends on {precondition}, which is not registered earlier in the pipeline")]
    UnregisteredPrecondition {
        /// The dependent checker, or `<version declaration>`.
        checker_id: String,
        /// The missing precondition.
        precondition: String,
    },

    /// A second version declaration stage was reached.
    #[error("schema version already declared as {declared:?}")]
    VersionAlreadyDeclared {
        /// The value from the first declaration.
        declared: Option<String>,
    },

    /// The aggregator rejected a driver operation.
    #[error(transparent)]
    Result(#[from] ResultError),
}

/// Failure while writing a report.
#[derive(Error, Debug)]
pub enum ReportError {
    /// Serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The report file could not be written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn driver_error_names_checker() {
        let err = DriverError::InvalidRuleUid {
            checker_id: "check_x".to_string(),
            source: ValidationError::InvalidRuleUid {
                value: "a:b".to_string(),
                segments: 2,
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("check_x"));
        assert!(msg.contains("a:b"));
    }

    #[test]
    fn rule_error_from_result_error_is_transparent() {
        let err: RuleError = ResultError::UnknownIssue { issue_id: 7 }.into();
        assert_eq!(err.to_string(), "issue not registered: #7");
    }

    #[test]
    fn unregistered_precondition_display() {
        let err = DriverError::UnregisteredPrecondition {
            checker_id: "check_b".to_string(),
            precondition: "check_a".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("check_b"));
        assert!(msg.contains("check_a"));
    }
}
