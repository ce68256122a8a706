//! # Rule Interface
//!
//! A [`Rule`] is one checker: an id, a description, a four-segment rule
//! UID, the checker ids it depends on, and a body. The driver only ever
//! sees `dyn Rule`; it never depends on concrete rule types.
//!
//! The body receives a [`RuleContext`] scoped to that rule. Issues
//! registered through the context are attributed to the rule's checker id
//! and rule UID automatically.

use std::fmt;

use omqc_core::{locate, IssueSeverity, LocateStrategy, PathSegment, TextPosition};
use omqc_schema::SchemaCatalog;

use crate::document::InputDocument;
use crate::error::RuleError;
use crate::result::{BundleResult, IssueId};

/// A pluggable validation unit.
pub trait Rule: fmt::Debug {
    /// Checker id, unique within a bundle.
    fn checker_id(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> &str;

    /// Four-segment rule UID; the third segment is the version gate.
    fn rule_uid(&self) -> &str;

    /// Checker ids that must be `COMPLETED` with no issues before this rule runs.
    fn preconditions(&self) -> Vec<&str> {
        Vec::new()
    }

    /// Whether the version gate applies. Rules that establish the
    /// document's version run before it is known and opt out.
    fn version_gated(&self) -> bool {
        true
    }

    /// Rule body.
    ///
    /// # Errors
    ///
    /// Any error is recorded as `ERROR` for this rule; the run continues.
    fn check(&self, ctx: &mut RuleContext<'_>) -> Result<RuleOutcome, RuleError>;
}

/// How a rule body ended when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    /// The body ran to the end.
    Completed,
    /// The body declined to check the document.
    Skipped {
        /// Summary explaining why.
        reason: String,
    },
}

impl RuleOutcome {
    /// A [`RuleOutcome::Skipped`] with the given reason.
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped {
            reason: reason.into(),
        }
    }
}

/// Per-rule view of the run.
pub struct RuleContext<'a> {
    document: &'a InputDocument,
    schema_version: Option<&'a str>,
    schemas: &'a SchemaCatalog,
    strategy: LocateStrategy,
    checker_id: &'a str,
    rule_uid: &'a str,
    result: &'a mut BundleResult,
}

impl<'a> RuleContext<'a> {
    /// Context for one invocation of the rule `checker_id`/`rule_uid`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        document: &'a InputDocument,
        schema_version: Option<&'a str>,
        schemas: &'a SchemaCatalog,
        strategy: LocateStrategy,
        checker_id: &'a str,
        rule_uid: &'a str,
        result: &'a mut BundleResult,
    ) -> Self {
        Self {
            document,
            schema_version,
            schemas,
            strategy,
            checker_id,
            rule_uid,
            result,
        }
    }

    /// The document under check.
    pub fn document(&self) -> &'a InputDocument {
        self.document
    }

    /// The declared schema version, if one was established.
    pub fn schema_version(&self) -> Option<&'a str> {
        self.schema_version
    }

    /// Schema resources available to the run.
    pub fn schemas(&self) -> &'a SchemaCatalog {
        self.schemas
    }

    /// Checker id of the running rule.
    pub fn checker_id(&self) -> &'a str {
        self.checker_id
    }

    /// Read access to the results so far.
    pub fn result(&self) -> &BundleResult {
        self.result
    }

    /// Register an issue against the running rule.
    ///
    /// # Errors
    ///
    /// Propagates aggregator errors.
    pub fn register_issue(
        &mut self,
        description: impl Into<String>,
        level: IssueSeverity,
    ) -> Result<IssueId, RuleError> {
        Ok(self
            .result
            .register_issue(self.checker_id, description, level, self.rule_uid)?)
    }

    /// Attach a location to an issue registered by this rule.
    ///
    /// # Errors
    ///
    /// Propagates aggregator errors.
    pub fn add_location(
        &mut self,
        issue_id: IssueId,
        position: TextPosition,
        description: impl Into<String>,
    ) -> Result<(), RuleError> {
        Ok(self
            .result
            .add_location(issue_id, position.row, position.column, description)?)
    }

    /// Append a summary line for the running rule.
    ///
    /// # Errors
    ///
    /// Propagates aggregator errors.
    pub fn add_summary(&mut self, text: impl Into<String>) -> Result<(), RuleError> {
        Ok(self.result.add_summary(self.checker_id, text)?)
    }

    /// Map a field path to a text position with the run's strategy.
    ///
    /// `None` when the document is not parsed or the path is not found.
    pub fn locate(&self, path: &[PathSegment]) -> Option<TextPosition> {
        let value = self.document.value().ok()?;
        let text = self.document.text()?;
        locate(self.strategy, value, text, path)
    }

    /// Register an issue and, if `path` can be located, attach the location.
    ///
    /// # Errors
    ///
    /// Propagates aggregator errors.
    pub fn register_issue_at(
        &mut self,
        description: impl Into<String>,
        level: IssueSeverity,
        path: &[PathSegment],
        location_description: impl Into<String>,
    ) -> Result<IssueId, RuleError> {
        let issue_id = self.register_issue(description, level)?;
        if let Some(position) = self.locate(path) {
            self.add_location(issue_id, position, location_description)?;
        }
        Ok(issue_id)
    }
}

impl fmt::Debug for RuleContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleContext")
            .field("document", &self.document.path())
            .field("schema_version", &self.schema_version)
            .field("strategy", &self.strategy)
            .field("checker_id", &self.checker_id)
            .field("rule_uid", &self.rule_uid)
            .finish_non_exhaustive()
    }
}
