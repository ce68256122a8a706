//! # omqc-checker — Checker Orchestration
//!
//! Runs an ordered pipeline of rules against one OpenMATERIAL 3D document
//! and collects a status and zero or more located issues per rule.
//!
//! ## Flow
//!
//! ```text
//! InputDocument ─┐
//! SchemaCatalog ─┼─> Driver::run(Pipeline) ─> BundleResult ─> Report (JSON)
//! LocateStrategy ┘
//! ```
//!
//! - [`result`]: the aggregator. Gating reads
//!   [`BundleResult::all_completed_without_issue`], which is false for a
//!   checker that completed *with* findings.
//! - [`rule`]: the [`Rule`] trait and the per-rule [`RuleContext`].
//! - [`driver`]: precondition and version gating, the failure boundary
//!   around each rule body.
//! - [`checks`] and [`bundle`]: the concrete xom rules and their order.
//! - [`report`]: JSON report and markdown documentation.

pub mod bundle;
pub mod checks;
pub mod document;
pub mod driver;
pub mod error;
pub mod report;
pub mod result;
pub mod rule;

pub use bundle::{new_result, run_bundle, xom_pipeline, BUNDLE_NAME};
pub use document::{DocumentState, InputDocument};
pub use driver::{Driver, Pipeline, RunOutcome, Stage};
pub use error::{DriverError, ReportError, ResultError, RuleError};
pub use report::{render_markdown, write_markdown, Report};
pub use result::{BundleResult, CheckerRecord, Issue, IssueId, Location};
pub use rule::{Rule, RuleContext, RuleOutcome};
