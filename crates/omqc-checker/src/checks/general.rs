//! Rules applying to every OpenMATERIAL 3D document.

use std::path::Path;

use serde_json::{Map, Value};

use omqc_core::{IssueSeverity, PathSegment, TextPosition};

use crate::document::DocumentState;
use crate::error::RuleError;
use crate::rule::{Rule, RuleContext, RuleOutcome};

use super::BASIC_PRECONDITIONS;

/// The input must exist and parse as JSON.
#[derive(Debug, Default, Clone, Copy)]
pub struct ValidJsonDocument;

impl ValidJsonDocument {
    /// Rule UID.
    pub const RULE_UID: &'static str = "asam.net:xom:1.0.0:general.valid_json_document";
    /// Checker id.
    pub const CHECKER_ID: &'static str = "check_asam.net:xom:1.0.0:general.valid_json_document";
}

impl Rule for ValidJsonDocument {
    fn checker_id(&self) -> &str {
        Self::CHECKER_ID
    }

    fn description(&self) -> &str {
        "The given file to check must be a valid JSON document."
    }

    fn rule_uid(&self) -> &str {
        Self::RULE_UID
    }

    fn version_gated(&self) -> bool {
        false
    }

    fn check(&self, ctx: &mut RuleContext<'_>) -> Result<RuleOutcome, RuleError> {
        match ctx.document().state().clone() {
            DocumentState::Missing => {
                ctx.register_issue("The input file does not exist.", IssueSeverity::Error)?;
            }
            DocumentState::Unreadable { .. } => {
                ctx.register_issue("The input file is not a valid json file.", IssueSeverity::Error)?;
            }
            DocumentState::Malformed {
                reason,
                line,
                column,
                ..
            } => {
                let issue = ctx
                    .register_issue("The input file is not a valid json file.", IssueSeverity::Error)?;
                ctx.add_location(issue, TextPosition { row: line, column }, reason)?;
            }
            DocumentState::Parsed { .. } => {}
        }
        Ok(RuleOutcome::Completed)
    }
}

/// `metadata.openMaterialVersion` must be present as a string.
#[derive(Debug, Default, Clone, Copy)]
pub struct VersionIsDefined;

impl VersionIsDefined {
    /// Rule UID.
    pub const RULE_UID: &'static str = "asam.net:xom:1.0.0:general.version_is_defined";
    /// Checker id.
    pub const CHECKER_ID: &'static str = "check_asam.net:xom:1.0.0:general.version_is_defined";
}

impl Rule for VersionIsDefined {
    fn checker_id(&self) -> &str {
        Self::CHECKER_ID
    }

    fn description(&self) -> &str {
        "The metadata of the file must contain an openMaterialVersion field."
    }

    fn rule_uid(&self) -> &str {
        Self::RULE_UID
    }

    fn preconditions(&self) -> Vec<&str> {
        vec![ValidJsonDocument::CHECKER_ID]
    }

    fn version_gated(&self) -> bool {
        false
    }

    fn check(&self, ctx: &mut RuleContext<'_>) -> Result<RuleOutcome, RuleError> {
        let value = ctx.document().value()?;
        let defined = value
            .pointer("/metadata/openMaterialVersion")
            .is_some_and(Value::is_string);
        if !defined {
            let path = [PathSegment::from("metadata")];
            ctx.register_issue_at(
                "Version attributes revMajor-revMinor missing or invalid",
                IssueSeverity::Error,
                &path,
                "openMaterialVersion missing or not a string.",
            )?;
        }
        Ok(RuleOutcome::Completed)
    }
}

/// The document must conform to the schema for its kind and version.
#[derive(Debug, Default, Clone, Copy)]
pub struct ValidSchema;

impl ValidSchema {
    /// Rule UID.
    pub const RULE_UID: &'static str = "asam.net:xom:1.0.0:general.valid_schema";
    /// Checker id.
    pub const CHECKER_ID: &'static str = "check_asam.net:xom:1.0.0:general.valid_schema";
}

impl Rule for ValidSchema {
    fn checker_id(&self) -> &str {
        Self::CHECKER_ID
    }

    fn description(&self) -> &str {
        "Input JSON file must be valid according to the corresponding schema."
    }

    fn rule_uid(&self) -> &str {
        Self::RULE_UID
    }

    fn preconditions(&self) -> Vec<&str> {
        vec![ValidJsonDocument::CHECKER_ID, VersionIsDefined::CHECKER_ID]
    }

    fn check(&self, ctx: &mut RuleContext<'_>) -> Result<RuleOutcome, RuleError> {
        let Some(version) = ctx.schema_version() else {
            return Ok(RuleOutcome::skipped("Schema version is not declared. Skip the check."));
        };
        let document = ctx.document();
        let resource = ctx.schemas().resolve(version, document.path())?.map(str::to_string);
        let Some(resource) = resource else {
            return Ok(RuleOutcome::skipped(format!(
                "No schema registered for version {version} and file {}. Skip the check.",
                document.path().display()
            )));
        };

        let value = document.value()?;
        let violations = ctx.schemas().validate(&resource, value)?;
        tracing::debug!(resource = %resource, count = violations.len(), "schema evaluated");

        for violation in violations {
            let path = violation.path_segments(value);
            let description = format!("Error in {}: {}", violation.dotted_path(value), violation.message);
            ctx.register_issue_at(description, IssueSeverity::Error, &path, violation.message.clone())?;
        }
        Ok(RuleOutcome::Completed)
    }
}

/// Every `...Uri`/`...Uris` property must name an existing file.
#[derive(Debug, Default, Clone, Copy)]
pub struct UrisExist;

impl UrisExist {
    /// Rule UID.
    pub const RULE_UID: &'static str = "asam.net:xom:1.0.0:general.uris_exist";
    /// Checker id.
    pub const CHECKER_ID: &'static str = "check_asam.net:xom:1.0.0:general.uris_exist";
}

impl Rule for UrisExist {
    fn checker_id(&self) -> &str {
        Self::CHECKER_ID
    }

    fn description(&self) -> &str {
        "If an URI property to other file is set in a JSON file, the file linked in that property shall exist."
    }

    fn rule_uid(&self) -> &str {
        Self::RULE_UID
    }

    fn preconditions(&self) -> Vec<&str> {
        BASIC_PRECONDITIONS.to_vec()
    }

    fn check(&self, ctx: &mut RuleContext<'_>) -> Result<RuleOutcome, RuleError> {
        let document = ctx.document();
        let base_dir = document.base_dir().to_path_buf();
        let Value::Object(root) = document.value()? else {
            return Ok(RuleOutcome::Completed);
        };

        let mut missing = Vec::new();
        collect_missing_uris(root, &base_dir, &mut Vec::new(), &mut missing);
        for (path, key, uri) in missing {
            ctx.register_issue_at(
                format!("The uri {uri} set in {key} does not exist."),
                IssueSeverity::Error,
                &path,
                "File does not exist.",
            )?;
        }
        Ok(RuleOutcome::Completed)
    }
}

type MissingUri = (Vec<PathSegment>, String, String);

fn collect_missing_uris(
    object: &Map<String, Value>,
    base_dir: &Path,
    prefix: &mut Vec<PathSegment>,
    out: &mut Vec<MissingUri>,
) {
    for (key, value) in object {
        prefix.push(PathSegment::Key(key.clone()));
        match value {
            Value::String(uri) if key.ends_with("Uri") => {
                if !base_dir.join(uri).exists() {
                    out.push((prefix.clone(), key.clone(), uri.clone()));
                }
            }
            Value::Array(items) if key.ends_with("Uris") => {
                for uri in items.iter().filter_map(Value::as_str) {
                    if !base_dir.join(uri).exists() {
                        out.push((prefix.clone(), key.clone(), uri.to_string()));
                    }
                }
            }
            Value::Object(nested) => collect_missing_uris(nested, base_dir, prefix, out),
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    if let Value::Object(nested) = item {
                        prefix.push(PathSegment::Index(index));
                        collect_missing_uris(nested, base_dir, prefix, out);
                        prefix.pop();
                    }
                }
            }
            _ => {}
        }
        prefix.pop();
    }
}
