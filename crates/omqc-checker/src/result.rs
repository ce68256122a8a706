//! # Result Aggregation
//!
//! [`BundleResult`] is the single source of truth for one run: the status
//! of every registered checker, its summaries, and the append-only list of
//! issues with their locations.
//!
//! ## Gating Contract
//!
//! [`BundleResult::all_completed_without_issue`] is what dependents are
//! gated on. It holds only when every named checker is `COMPLETED` **and**
//! has zero issues. A checker that ran to the end but reported findings
//! does not satisfy it: completed and passed are different things.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use omqc_core::{IssueSeverity, Status};

use crate::error::ResultError;

/// Handle returned by [`BundleResult::register_issue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueId(pub usize);

impl fmt::Display for IssueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A line/column anchor attached to one issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// 1-based line.
    pub row: usize,
    /// Column; 0 when unknown.
    pub column: usize,
    /// What is at this location.
    pub description: String,
}

/// A registered finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Position in registration order.
    pub issue_id: IssueId,
    /// Checker that registered the issue.
    pub checker_id: String,
    /// Rule the issue violates.
    pub rule_uid: String,
    /// Human-readable finding.
    pub description: String,
    /// Severity.
    pub level: IssueSeverity,
    /// Source anchors, possibly none.
    pub locations: Vec<Location>,
}

/// Registration metadata and status of one checker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckerRecord {
    /// Checker id.
    pub checker_id: String,
    /// Human-readable description.
    pub description: String,
    /// Rule UIDs this checker verifies.
    pub rule_uids: Vec<String>,
    /// Current status.
    pub status: Status,
    /// Explanations attached by the driver or the rule.
    pub summary: Vec<String>,
}

/// Per-run result of one checker bundle.
#[derive(Debug, Clone)]
pub struct BundleResult {
    name: String,
    description: String,
    version: String,
    checkers: Vec<CheckerRecord>,
    index: HashMap<String, usize>,
    issues: Vec<Issue>,
}

impl BundleResult {
    /// An empty result for the named bundle.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            version: version.into(),
            checkers: Vec::new(),
            index: HashMap::new(),
            issues: Vec::new(),
        }
    }

    /// Bundle name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bundle description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Bundle version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Register a checker with status `PENDING`.
    ///
    /// Registering the same id again keeps the first record untouched.
    pub fn register_checker(&mut self, checker_id: &str, description: &str) {
        if self.index.contains_key(checker_id) {
            return;
        }
        self.index.insert(checker_id.to_string(), self.checkers.len());
        self.checkers.push(CheckerRecord {
            checker_id: checker_id.to_string(),
            description: description.to_string(),
            rule_uids: Vec::new(),
            status: Status::Pending,
            summary: Vec::new(),
        });
    }

    /// Record that `checker_id` verifies `rule_uid`.
    ///
    /// # Errors
    ///
    /// Returns [`ResultError::UnknownChecker`] if the checker is not registered.
    pub fn register_rule_uid(&mut self, checker_id: &str, rule_uid: &str) -> Result<(), ResultError> {
        let record = self.record_mut(checker_id)?;
        if !record.rule_uids.iter().any(|uid| uid == rule_uid) {
            record.rule_uids.push(rule_uid.to_string());
        }
        Ok(())
    }

    /// Overwrite the status of a checker.
    ///
    /// # Errors
    ///
    /// Returns [`ResultError::PendingNotTerminal`] for `Status::Pending` and
    /// [`ResultError::UnknownChecker`] for an unregistered id.
    pub fn set_status(&mut self, checker_id: &str, status: Status) -> Result<(), ResultError> {
        if !status.is_terminal() {
            return Err(ResultError::PendingNotTerminal {
                checker_id: checker_id.to_string(),
            });
        }
        self.record_mut(checker_id)?.status = status;
        Ok(())
    }

    /// Append an explanation to a checker's summary.
    ///
    /// # Errors
    ///
    /// Returns [`ResultError::UnknownChecker`] if the checker is not registered.
    pub fn add_summary(&mut self, checker_id: &str, text: impl Into<String>) -> Result<(), ResultError> {
        self.record_mut(checker_id)?.summary.push(text.into());
        Ok(())
    }

    /// Append an issue and return its handle.
    ///
    /// # Errors
    ///
    /// Returns [`ResultError::UnknownChecker`] if the checker is not registered.
    pub fn register_issue(
        &mut self,
        checker_id: &str,
        description: impl Into<String>,
        level: IssueSeverity,
        rule_uid: &str,
    ) -> Result<IssueId, ResultError> {
        self.record(checker_id)?;
        let issue_id = IssueId(self.issues.len());
        self.issues.push(Issue {
            issue_id,
            checker_id: checker_id.to_string(),
            rule_uid: rule_uid.to_string(),
            description: description.into(),
            level,
            locations: Vec::new(),
        });
        Ok(issue_id)
    }

    /// Append a location to an existing issue.
    ///
    /// # Errors
    ///
    /// Returns [`ResultError::UnknownIssue`] if no issue has this id.
    pub fn add_location(
        &mut self,
        issue_id: IssueId,
        row: usize,
        column: usize,
        description: impl Into<String>,
    ) -> Result<(), ResultError> {
        let issue = self
            .issues
            .get_mut(issue_id.0)
            .ok_or(ResultError::UnknownIssue { issue_id: issue_id.0 })?;
        issue.locations.push(Location {
            row,
            column,
            description: description.into(),
        });
        Ok(())
    }

    /// Current status, or `None` for an unregistered checker.
    pub fn get_status(&self, checker_id: &str) -> Option<Status> {
        self.record(checker_id).ok().map(|r| r.status)
    }

    /// True if the checker has been registered.
    pub fn is_registered(&self, checker_id: &str) -> bool {
        self.index.contains_key(checker_id)
    }

    /// True only if every named checker is `COMPLETED` with zero issues.
    ///
    /// An unregistered checker never satisfies the predicate. The empty set does.
    pub fn all_completed_without_issue<'a, I>(&self, checker_ids: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        checker_ids.into_iter().all(|id| {
            self.get_status(id) == Some(Status::Completed) && self.issue_count(id) == 0
        })
    }

    /// Number of issues registered by a checker.
    pub fn issue_count(&self, checker_id: &str) -> usize {
        self.issues_of(checker_id).count()
    }

    /// Issues registered by a checker, in registration order.
    pub fn issues_of<'a>(&'a self, checker_id: &'a str) -> impl Iterator<Item = &'a Issue> + 'a {
        self.issues.iter().filter(move |i| i.checker_id == checker_id)
    }

    /// Issues violating a rule UID, in registration order.
    pub fn issues_by_rule_uid(&self, rule_uid: &str) -> Vec<&Issue> {
        self.issues.iter().filter(|i| i.rule_uid == rule_uid).collect()
    }

    /// All checker records in registration order.
    pub fn checkers(&self) -> &[CheckerRecord] {
        &self.checkers
    }

    /// Look up one checker record.
    pub fn checker(&self, checker_id: &str) -> Option<&CheckerRecord> {
        self.record(checker_id).ok()
    }

    /// All issues in registration order.
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Checkers still `PENDING`.
    pub fn pending_checkers(&self) -> Vec<&str> {
        self.checkers
            .iter()
            .filter(|r| !r.status.is_terminal())
            .map(|r| r.checker_id.as_str())
            .collect()
    }

    /// One-line digest: checker counts by status and total issues.
    pub fn summary_line(&self) -> String {
        let count = |status: Status| self.checkers.iter().filter(|r| r.status == status).count();
        format!(
            "{} checkers: {} completed, {} skipped, {} error; {} issues",
            self.checkers.len(),
            count(Status::Completed),
            count(Status::Skipped),
            count(Status::Error),
            self.issues.len()
        )
    }

    fn record(&self, checker_id: &str) -> Result<&CheckerRecord, ResultError> {
        self.index
            .get(checker_id)
            .map(|&i| &self.checkers[i])
            .ok_or_else(|| ResultError::UnknownChecker {
                checker_id: checker_id.to_string(),
            })
    }

    fn record_mut(&mut self, checker_id: &str) -> Result<&mut CheckerRecord, ResultError> {
        match self.index.get(checker_id) {
            Some(&i) => Ok(&mut self.checkers[i]),
            None => Err(ResultError::UnknownChecker {
                checker_id: checker_id.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with(ids: &[&str]) -> BundleResult {
        let mut result = BundleResult::new("testBundle", "test", "0.0.1");
        for id in ids {
            result.register_checker(id, "desc");
        }
        result
    }

    #[test]
    fn registration_starts_pending() {
        let result = result_with(&["a"]);
        assert_eq!(result.get_status("a"), Some(Status::Pending));
        assert_eq!(result.get_status("b"), None);
        assert_eq!(result.pending_checkers(), vec!["a"]);
    }

    #[test]
    fn registration_is_idempotent() {
        let mut result = result_with(&["a"]);
        result.set_status("a", Status::Completed).unwrap();
        result.register_checker("a", "other description");
        assert_eq!(result.checkers().len(), 1);
        assert_eq!(result.get_status("a"), Some(Status::Completed));
        assert_eq!(result.checker("a").unwrap().description, "desc");
    }

    #[test]
    fn rule_uid_registered_once() {
        let mut result = result_with(&["a"]);
        result.register_rule_uid("a", "x:y:1.0.0:c.n").unwrap();
        result.register_rule_uid("a", "x:y:1.0.0:c.n").unwrap();
        assert_eq!(result.checker("a").unwrap().rule_uids.len(), 1);
        assert!(result.register_rule_uid("b", "x:y:1.0.0:c.n").is_err());
    }

    #[test]
    fn pending_cannot_be_set() {
        let mut result = result_with(&["a"]);
        let err = result.set_status("a", Status::Pending).unwrap_err();
        assert!(matches!(err, ResultError::PendingNotTerminal { .. }));
    }

    #[test]
    fn completed_with_issue_does_not_pass() {
        let mut result = result_with(&["a", "b"]);
        result.set_status("a", Status::Completed).unwrap();
        result.set_status("b", Status::Completed).unwrap();
        assert!(result.all_completed_without_issue(["a", "b"]));

        result
            .register_issue("b", "finding", IssueSeverity::Warning, "x:y:1.0.0:c.n")
            .unwrap();
        assert_eq!(result.get_status("b"), Some(Status::Completed));
        assert!(!result.all_completed_without_issue(["a", "b"]));
        assert!(result.all_completed_without_issue(["a"]));
    }

    #[test]
    fn skipped_and_unknown_do_not_pass() {
        let mut result = result_with(&["a"]);
        result.set_status("a", Status::Skipped).unwrap();
        assert!(!result.all_completed_without_issue(["a"]));
        assert!(!result.all_completed_without_issue(["missing"]));
        assert!(result.all_completed_without_issue(std::iter::empty::<&str>()));
    }

    #[test]
    fn issues_and_locations_append() {
        let mut result = result_with(&["a", "b"]);
        let first = result
            .register_issue("a", "one", IssueSeverity::Error, "x:y:1.0.0:c.a")
            .unwrap();
        let second = result
            .register_issue("b", "two", IssueSeverity::Error, "x:y:1.0.0:c.b")
            .unwrap();
        assert_eq!(first, IssueId(0));
        assert_eq!(second, IssueId(1));

        result.add_location(first, 3, 0, "here").unwrap();
        result.add_location(first, 5, 2, "and here").unwrap();
        assert_eq!(result.issues()[0].locations.len(), 2);
        assert_eq!(result.issues()[0].locations[1].row, 5);

        assert_eq!(result.issues_by_rule_uid("x:y:1.0.0:c.b").len(), 1);
        assert_eq!(result.issue_count("a"), 1);
        assert!(result.add_location(IssueId(9), 1, 0, "nowhere").is_err());
        assert!(result
            .register_issue("zzz", "x", IssueSeverity::Error, "u")
            .is_err());
    }

    #[test]
    fn summary_line_counts() {
        let mut result = result_with(&["a", "b", "c"]);
        result.set_status("a", Status::Completed).unwrap();
        result.set_status("b", Status::Skipped).unwrap();
        result.set_status("c", Status::Error).unwrap();
        result.register_issue("a", "x", IssueSeverity::Error, "u").unwrap();
        assert_eq!(
            result.summary_line(),
            "3 checkers: 1 completed, 1 skipped, 1 error; 1 issues"
        );
    }
}
