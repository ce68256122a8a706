//! # Checker Status & Issue Severity
//!
//! [`Status`] is the lifecycle of one checker in one run. `Pending` is the
//! only non-terminal value; after the run every checker holds exactly one
//! of `Completed`, `Skipped` or `Error`.
//!
//! [`IssueSeverity`] grades findings. Precondition gating counts issues and
//! ignores their severity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Execution status of a checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// Registered, not yet run.
    Pending,
    /// The rule body ran to the end. It may still have registered issues.
    Completed,
    /// Preconditions or the version gate excluded the rule, or the rule
    /// declined to run.
    Skipped,
    /// The rule body failed.
    Error,
}

impl Status {
    /// True for every status a finished run may report.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Report spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Completed => "COMPLETED",
            Self::Skipped => "SKIPPED",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a registered issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueSeverity {
    /// The document violates the rule.
    Error,
    /// The document is suspicious but conforming.
    Warning,
    /// Informational finding.
    Information,
}

impl fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "ERROR"),
            Self::Warning => write!(f, "WARNING"),
            Self::Information => write!(f, "INFORMATION"),
        }
    }
}
