//! Rules that only apply to asset (`.xoma`) documents.

use serde_json::Value;

use omqc_core::{IssueSeverity, PathSegment};

use crate::error::RuleError;
use crate::rule::{Rule, RuleContext, RuleOutcome};

use super::BASIC_PRECONDITIONS;

const ASSET_EXTENSION: &str = "xoma";
const TEXTURE_ASSIGNMENT: &str = "materialTextureAssignment";
const MAPPING_URI: &str = "materialMappingUri";

/// The parsed document if it is an asset, otherwise `None`.
fn asset<'v>(ctx: &RuleContext<'v>) -> Result<Option<&'v Value>, RuleError> {
    let document = ctx.document();
    if document.extension().as_deref() != Some(ASSET_EXTENSION) {
        return Ok(None);
    }
    Ok(Some(document.value()?))
}

/// The texture assignments of an asset, or `None` when the rule does not apply.
fn texture_assignments<'v>(ctx: &RuleContext<'v>) -> Result<Option<&'v Vec<Value>>, RuleError> {
    Ok(asset(ctx)?.and_then(|value| value.get(TEXTURE_ASSIGNMENT)).and_then(Value::as_array))
}

/// Textures named in `materialTextureAssignment` must exist.
#[derive(Debug, Default, Clone, Copy)]
pub struct MaterialTexturesExist;

impl MaterialTexturesExist {
    /// Rule UID.
    pub const RULE_UID: &'static str = "asam.net:xom:1.0.0:xoma.material_textures_exist";
    /// Checker id.
    pub const CHECKER_ID: &'static str = "check_asam.net:xom:1.0.0:xoma.material_textures_exist";
}

impl Rule for MaterialTexturesExist {
    fn checker_id(&self) -> &str {
        Self::CHECKER_ID
    }

    fn description(&self) -> &str {
        "Textures mapped to material names in the 'materialTextureAssignment' field of .xoma files shall exist."
    }

    fn rule_uid(&self) -> &str {
        Self::RULE_UID
    }

    fn preconditions(&self) -> Vec<&str> {
        BASIC_PRECONDITIONS.to_vec()
    }

    fn check(&self, ctx: &mut RuleContext<'_>) -> Result<RuleOutcome, RuleError> {
        let Some(assignments) = texture_assignments(ctx)? else {
            return Ok(RuleOutcome::Completed);
        };
        let base_dir = ctx.document().base_dir();

        let missing: Vec<&str> = assignments
            .iter()
            .filter_map(|entry| entry.get(1).and_then(Value::as_str))
            .filter(|texture| !base_dir.join(texture).exists())
            .collect();

        let path = [PathSegment::from(TEXTURE_ASSIGNMENT)];
        for texture in missing {
            ctx.register_issue_at(
                format!("The texture path {texture} set in the {TEXTURE_ASSIGNMENT} does not exist."),
                IssueSeverity::Error,
                &path,
                "File does not exist.",
            )?;
        }
        Ok(RuleOutcome::Completed)
    }
}

/// `materialTextureAssignment` requires `materialMappingUri`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextureAssignmentRequiresMapping;

impl TextureAssignmentRequiresMapping {
    /// Rule UID.
    pub const RULE_UID: &'static str = "asam.net:xomgeo:1.0.0:xoma.texture_assignment_requires_mapping";
    /// Checker id.
    pub const CHECKER_ID: &'static str =
        "check_asam.net:xomgeo:1.0.0:xoma.texture_assignment_requires_mapping";
}

impl Rule for TextureAssignmentRequiresMapping {
    fn checker_id(&self) -> &str {
        Self::CHECKER_ID
    }

    fn description(&self) -> &str {
        "If the property 'materialTextureAssignment' is set, 'materialMappingUri' must also be set."
    }

    fn rule_uid(&self) -> &str {
        Self::RULE_UID
    }

    fn preconditions(&self) -> Vec<&str> {
        BASIC_PRECONDITIONS.to_vec()
    }

    fn check(&self, ctx: &mut RuleContext<'_>) -> Result<RuleOutcome, RuleError> {
        let Some(value) = asset(ctx)? else {
            return Ok(RuleOutcome::Completed);
        };
        if value.get(TEXTURE_ASSIGNMENT).is_some() && value.get(MAPPING_URI).is_none() {
            ctx.register_issue_at(
                format!("{TEXTURE_ASSIGNMENT} is set in the xoma file but the {MAPPING_URI} property is not set."),
                IssueSeverity::Error,
                &[PathSegment::from(TEXTURE_ASSIGNMENT)],
                format!("{MAPPING_URI} does not exist."),
            )?;
        }
        Ok(RuleOutcome::Completed)
    }
}
