//! # Reports
//!
//! JSON result report and the generated markdown documentation of a
//! checker bundle.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use omqc_core::{RuleUid, Status};

use crate::driver::Pipeline;
use crate::error::ReportError;
use crate::result::{BundleResult, Issue};

/// Format version of the JSON report.
pub const REPORT_VERSION: &str = "1.0.0";

/// File name of the generated markdown documentation.
pub const MARKDOWN_FILE_NAME: &str = "generated_checker_bundle_doc.md";

/// Top-level JSON report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Report format version.
    pub version: String,
    /// Generation time.
    pub timestamp: DateTime<Utc>,
    /// Parameters copied from the configuration.
    #[serde(default)]
    pub params: BTreeMap<String, String>,
    /// One entry per bundle.
    pub bundles: Vec<BundleReport>,
}

/// Report section for one bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleReport {
    /// Bundle name.
    pub name: String,
    /// Bundle version.
    pub version: String,
    /// Bundle description.
    pub description: String,
    /// Status counts and issue total.
    pub summary: String,
    /// Checkers in execution order.
    pub checkers: Vec<CheckerReport>,
}

/// Report section for one checker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckerReport {
    /// Checker id.
    pub checker_id: String,
    /// Description.
    pub description: String,
    /// Rule UIDs.
    pub rule_uids: Vec<String>,
    /// Terminal status.
    pub status: Status,
    /// Summaries.
    pub summary: Vec<String>,
    /// Issues registered by the checker.
    pub issues: Vec<Issue>,
}

impl BundleReport {
    /// Snapshot a bundle result.
    pub fn from_result(result: &BundleResult) -> Self {
        let checkers = result
            .checkers()
            .iter()
            .map(|record| CheckerReport {
                checker_id: record.checker_id.clone(),
                description: record.description.clone(),
                rule_uids: record.rule_uids.clone(),
                status: record.status,
                summary: record.summary.clone(),
                issues: result.issues_of(&record.checker_id).cloned().collect(),
            })
            .collect();
        Self {
            name: result.name().to_string(),
            version: result.version().to_string(),
            description: result.description().to_string(),
            summary: result.summary_line(),
            checkers,
        }
    }
}

impl Report {
    /// An empty report stamped with the current time.
    pub fn new(params: BTreeMap<String, String>) -> Self {
        Self {
            version: REPORT_VERSION.to_string(),
            timestamp: Utc::now(),
            params,
            bundles: Vec::new(),
        }
    }

    /// Append a bundle section.
    pub fn with_bundle(mut self, result: &BundleResult) -> Self {
        self.bundles.push(BundleReport::from_result(result));
        self
    }

    /// Look up a checker across all bundles.
    pub fn checker(&self, checker_id: &str) -> Option<&CheckerReport> {
        self.bundles
            .iter()
            .flat_map(|b| b.checkers.iter())
            .find(|c| c.checker_id == checker_id)
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Json`] if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the pretty-printed JSON to `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`ReportError`] on serialization or I/O failure.
    pub fn write(&self, path: &Path) -> Result<(), ReportError> {
        fs::write(path, self.to_json_pretty()?)?;
        tracing::info!(path = %path.display(), "report written");
        Ok(())
    }

    /// Read a report back from `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`ReportError`] on I/O or parse failure.
    pub fn read(path: &Path) -> Result<Self, ReportError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Markdown table documenting every checker in `pipeline`.
pub fn render_markdown(bundle_name: &str, pipeline: &Pipeline) -> String {
    let mut out = format!("# Checker bundle: {bundle_name}\n\n");
    out.push_str("| Checker id | Description | Rule UID | Preconditions | Version gate |\n");
    out.push_str("|---|---|---|---|---|\n");
    for rule in pipeline.rules() {
        let preconditions = rule.preconditions();
        let preconditions = if preconditions.is_empty() {
            "-".to_string()
        } else {
            preconditions.join("<br>")
        };
        let gate = match (rule.version_gated(), RuleUid::parse(rule.rule_uid())) {
            (true, Ok(uid)) => uid.definition_setting().to_string(),
            (true, Err(_)) => "invalid".to_string(),
            (false, _) => "-".to_string(),
        };
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            rule.checker_id(),
            rule.description().replace('|', "\\|"),
            rule.rule_uid(),
            preconditions,
            gate
        ));
    }
    out
}

/// Write [`render_markdown`] output to `dir/`[`MARKDOWN_FILE_NAME`].
///
/// # Errors
///
/// Returns [`ReportError::Io`] if the file cannot be written.
pub fn write_markdown(dir: &Path, bundle_name: &str, pipeline: &Pipeline) -> Result<(), ReportError> {
    let path = dir.join(MARKDOWN_FILE_NAME);
    fs::write(&path, render_markdown(bundle_name, pipeline))?;
    tracing::info!(path = %path.display(), "bundle documentation written");
    Ok(())
}
