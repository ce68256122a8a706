//! # Execution Driver
//!
//! Runs a statically ordered [`Pipeline`] of rules against one document.
//!
//! ## Per-rule protocol
//!
//! 1. Register the checker and its rule UID.
//! 2. Parse the rule UID. A malformed UID or gate aborts the run.
//! 3. Every precondition must name a checker registered earlier. If not,
//!    the run aborts: the pipeline is misordered.
//! 4. Preconditions not all `COMPLETED` without issues: `SKIPPED`.
//! 5. Version-gated rule with no declared version, or a declared version
//!    below the gate: `SKIPPED`.
//! 6. Otherwise the body runs inside a failure boundary. A returned error
//!    or a panic becomes `ERROR`; the run continues with the next rule.
//!
//! The declared schema version is established by a
//! [`Stage::DeclareVersion`] stage and is read-only afterwards.

use std::cmp::Ordering;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use omqc_core::{LocateStrategy, RuleUid, SchemaVersion, Status};
use omqc_schema::SchemaCatalog;

use crate::document::InputDocument;
use crate::error::{DriverError, RuleError};
use crate::result::BundleResult;
use crate::rule::{Rule, RuleContext, RuleOutcome};

/// Summary attached when preconditions gate a rule out.
pub const PRECONDITIONS_NOT_MET: &str = "Preconditions are not satisfied. Skip the check.";

/// One step of a pipeline.
#[derive(Debug)]
pub enum Stage {
    /// Run a rule.
    Rule(Box<dyn Rule>),
    /// Establish the declared schema version from the document.
    DeclareVersion {
        /// Checkers that must be `COMPLETED` without issues first.
        requires: Vec<String>,
        /// JSON Pointer to the version string.
        pointer: String,
    },
}

/// An ordered list of stages.
#[derive(Debug, Default)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    /// An empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule.
    pub fn rule(mut self, rule: impl Rule + 'static) -> Self {
        self.stages.push(Stage::Rule(Box::new(rule)));
        self
    }

    /// Append a version declaration.
    pub fn declare_version<I, S>(mut self, requires: I, pointer: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stages.push(Stage::DeclareVersion {
            requires: requires.into_iter().map(Into::into).collect(),
            pointer: pointer.into(),
        });
        self
    }

    /// Stages in execution order.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Rules in execution order.
    pub fn rules(&self) -> impl Iterator<Item = &dyn Rule> {
        self.stages.iter().filter_map(|stage| match stage {
            Stage::Rule(rule) => Some(rule.as_ref()),
            Stage::DeclareVersion { .. } => None,
        })
    }
}

/// Counts produced by a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutcome {
    /// Declared schema version, if one was established.
    pub schema_version: Option<String>,
    /// Rules that ended `COMPLETED`.
    pub completed: usize,
    /// Rules that ended `SKIPPED`.
    pub skipped: usize,
    /// Rules that ended `ERROR`.
    pub errored: usize,
}

impl RunOutcome {
    fn record(&mut self, status: Status) {
        match status {
            Status::Completed => self.completed += 1,
            Status::Skipped => self.skipped += 1,
            Status::Error => self.errored += 1,
            Status::Pending => {}
        }
    }
}

/// Gating decision for one rule.
enum Gate {
    Fatal(DriverError),
    Skip(String),
    Run,
}

/// Runs pipelines against schema resources with a fixed location strategy.
pub struct Driver {
    schemas: SchemaCatalog,
    strategy: LocateStrategy,
}

impl fmt::Debug for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Driver")
            .field("schemas", &self.schemas.schema_count())
            .field("strategy", &self.strategy)
            .finish()
    }
}

impl Driver {
    /// A driver over `schemas` using the default location strategy.
    pub fn new(schemas: SchemaCatalog) -> Self {
        Self {
            schemas,
            strategy: LocateStrategy::default(),
        }
    }

    /// Override the location strategy.
    pub fn with_strategy(mut self, strategy: LocateStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Schema resources handed to rules.
    pub fn schemas(&self) -> &SchemaCatalog {
        &self.schemas
    }

    /// Run every stage of `pipeline` against `document`.
    ///
    /// # Errors
    ///
    /// Returns a [`DriverError`] for pipeline configuration defects. Rule
    /// failures never surface here; they are recorded as `ERROR`.
    pub fn run(
        &self,
        pipeline: &Pipeline,
        document: &InputDocument,
        result: &mut BundleResult,
    ) -> Result<RunOutcome, DriverError> {
        let mut outcome = RunOutcome::default();
        let mut declared: Option<Option<String>> = None;

        for stage in pipeline.stages() {
            match stage {
                Stage::DeclareVersion { requires, pointer } => {
                    if let Some(previous) = declared {
                        return Err(DriverError::VersionAlreadyDeclared { declared: previous });
                    }
                    let version = declare_version(requires, pointer, document, result)?;
                    declared = Some(version);
                }
                Stage::Rule(rule) => {
                    let version = declared.as_ref().and_then(|v| v.as_deref());
                    let status = self.run_rule(rule.as_ref(), version, document, result)?;
                    outcome.record(status);
                }
            }
        }

        outcome.schema_version = declared.flatten();
        tracing::debug!(summary = %result.summary_line(), "pipeline finished");
        Ok(outcome)
    }

    fn run_rule(
        &self,
        rule: &dyn Rule,
        schema_version: Option<&str>,
        document: &InputDocument,
        result: &mut BundleResult,
    ) -> Result<Status, DriverError> {
        let checker_id = rule.checker_id();
        result.register_checker(checker_id, rule.description());
        result.register_rule_uid(checker_id, rule.rule_uid())?;

        let (status, summary) = match gate(rule, schema_version, result) {
            Gate::Fatal(err) => {
                tracing::error!(checker_id, error = %err, "fatal pipeline configuration error");
                return Err(err);
            }
            Gate::Skip(reason) => (Status::Skipped, Some(reason)),
            Gate::Run => self.execute(rule, schema_version, document, result),
        };

        result.set_status(checker_id, status)?;
        if let Some(summary) = summary {
            result.add_summary(checker_id, summary)?;
        }
        Ok(status)
    }

    fn execute(
        &self,
        rule: &dyn Rule,
        schema_version: Option<&str>,
        document: &InputDocument,
        result: &mut BundleResult,
    ) -> (Status, Option<String>) {
        let checker_id = rule.checker_id();
        tracing::info!(checker_id, "executing check");

        let mut ctx = RuleContext::new(
            document,
            schema_version,
            &self.schemas,
            self.strategy,
            checker_id,
            rule.rule_uid(),
            result,
        );
        let ran = panic::catch_unwind(AssertUnwindSafe(|| rule.check(&mut ctx)));

        match ran {
            Ok(Ok(RuleOutcome::Completed)) => (Status::Completed, None),
            Ok(Ok(RuleOutcome::Skipped { reason })) => {
                tracing::info!(checker_id, %reason, "check skipped itself");
                (Status::Skipped, Some(reason))
            }
            Ok(Err(err)) => failed(checker_id, &err),
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                failed(checker_id, &RuleError::Failed(message))
            }
        }
    }
}

fn gate(rule: &dyn Rule, schema_version: Option<&str>, result: &BundleResult) -> Gate {
    let checker_id = rule.checker_id();

    let uid = match RuleUid::parse(rule.rule_uid()) {
        Ok(uid) => uid,
        Err(source) => {
            return Gate::Fatal(DriverError::InvalidRuleUid {
                checker_id: checker_id.to_string(),
                source,
            })
        }
    };
    let threshold = match uid.version_gate() {
        Ok(threshold) => threshold,
        Err(source) => {
            return Gate::Fatal(DriverError::InvalidVersionGate {
                checker_id: checker_id.to_string(),
                source,
            })
        }
    };

    let preconditions = rule.preconditions();
    if let Some(missing) = preconditions
        .iter()
        .find(|p| **p == checker_id || !result.is_registered(p))
    {
        return Gate::Fatal(DriverError::UnregisteredPrecondition {
            checker_id: checker_id.to_string(),
            precondition: missing.to_string(),
        });
    }

    if !result.all_completed_without_issue(preconditions.iter().copied()) {
        tracing::debug!(checker_id, ?preconditions, "preconditions not satisfied");
        return Gate::Skip(PRECONDITIONS_NOT_MET.to_string());
    }

    if !rule.version_gated() {
        return Gate::Run;
    }

    let Some(declared) = schema_version else {
        tracing::warn!(checker_id, "schema version not declared");
        return Gate::Skip("Schema version is not declared. Skip the check.".to_string());
    };
    match SchemaVersion::parse(declared) {
        Ok(version) if version.cmp(&threshold) == Ordering::Less => {
            tracing::debug!(checker_id, %version, %threshold, "below version gate");
            Gate::Skip(format!(
                "Version {version} is lower than definition setting {threshold}. Skip the check."
            ))
        }
        Ok(_) => Gate::Run,
        Err(err) => {
            tracing::warn!(checker_id, declared, error = %err, "declared version is not comparable");
            Gate::Skip(format!("Version {declared} cannot be compared: {err}. Skip the check."))
        }
    }
}

fn declare_version(
    requires: &[String],
    pointer: &str,
    document: &InputDocument,
    result: &BundleResult,
) -> Result<Option<String>, DriverError> {
    if let Some(missing) = requires.iter().find(|r| !result.is_registered(r)) {
        return Err(DriverError::UnregisteredPrecondition {
            checker_id: "<version declaration>".to_string(),
            precondition: missing.clone(),
        });
    }
    if !result.all_completed_without_issue(requires.iter().map(String::as_str)) {
        tracing::warn!("version prerequisites not satisfied, schema version stays undeclared");
        return Ok(None);
    }

    let version = document
        .value()
        .ok()
        .and_then(|value| value.pointer(pointer))
        .and_then(|v| v.as_str())
        .map(str::to_string);
    match &version {
        Some(v) => tracing::info!(schema_version = %v, "declared schema version"),
        None => tracing::warn!(pointer, "no schema version string at pointer"),
    }
    Ok(version)
}

fn failed(checker_id: &str, err: &RuleError) -> (Status, Option<String>) {
    tracing::error!(checker_id, error = %err, "check failed");
    (Status::Error, Some(format!("Error: {err}.")))
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "rule panicked".to_string()
    }
}
