//! # Rule UIDs
//!
//! A rule UID has exactly four colon-separated segments:
//!
//! ```text
//! asam.net : xom : 1.0.0 : general.valid_schema
//! namespace  domain  gate    category.name
//! ```
//!
//! The third segment is the definition setting: the lowest declared schema
//! version for which the rule applies. A UID with any other number of
//! segments is a configuration defect of the rule, not of the document.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::version::SchemaVersion;

/// A parsed four-segment rule UID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RuleUid {
    namespace: String,
    domain: String,
    definition_setting: String,
    rule_name: String,
}

impl RuleUid {
    /// Parse a rule UID string.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidRuleUid`] unless there are exactly
    /// four segments.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let segments: Vec<&str> = value.split(':').collect();
        match segments.as_slice() {
            [namespace, domain, definition_setting, rule_name] => Ok(Self {
                namespace: (*namespace).to_string(),
                domain: (*domain).to_string(),
                definition_setting: (*definition_setting).to_string(),
                rule_name: (*rule_name).to_string(),
            }),
            _ => Err(ValidationError::InvalidRuleUid {
                value: value.to_string(),
                segments: segments.len(),
            }),
        }
    }

    /// Issuing organisation, e.g. `asam.net`.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Standard the rule belongs to, e.g. `xom`.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// The raw version gate segment.
    pub fn definition_setting(&self) -> &str {
        &self.definition_setting
    }

    /// The version gate as a parsed version.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidVersion`] if the gate segment is not
    /// a dotted numeric version.
    pub fn version_gate(&self) -> Result<SchemaVersion, ValidationError> {
        SchemaVersion::parse(&self.definition_setting)
    }

    /// The `category.name` segment.
    pub fn rule_name(&self) -> &str {
        &self.rule_name
    }

    /// The category part of the last segment (`general` in `general.valid_schema`).
    pub fn category(&self) -> &str {
        self.rule_name
            .split_once('.')
            .map_or(self.rule_name.as_str(), |(category, _)| category)
    }
}

impl FromStr for RuleUid {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RuleUid {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RuleUid> for String {
    fn from(uid: RuleUid) -> Self {
        uid.to_string()
    }
}

impl fmt::Display for RuleUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.namespace, self.domain, self.definition_setting, self.rule_name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_four_segments() {
        let uid = RuleUid::parse("asam.net:xom:1.0.0:general.valid_schema").unwrap();
        assert_eq!(uid.namespace(), "asam.net");
        assert_eq!(uid.domain(), "xom");
        assert_eq!(uid.definition_setting(), "1.0.0");
        assert_eq!(uid.rule_name(), "general.valid_schema");
        assert_eq!(uid.category(), "general");
        assert_eq!(uid.version_gate().unwrap(), SchemaVersion::parse("1.0.0").unwrap());
    }

    #[test]
    fn display_matches_input() {
        let raw = "asam.net:xomgeo:1.0.0:xoma.texture_assignment_requires_mapping";
        assert_eq!(RuleUid::parse(raw).unwrap().to_string(), raw);
    }

    #[test]
    fn three_segments_rejected() {
        let err = RuleUid::parse("asam.net:xom:general.valid_schema").unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidRuleUid {
                value: "asam.net:xom:general.valid_schema".to_string(),
                segments: 3,
            }
        );
    }

    #[test]
    fn five_segments_rejected() {
        let err = RuleUid::parse("asam.net:xom:1.0.0:general:extra").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidRuleUid { segments: 5, .. }));
    }

    #[test]
    fn non_numeric_gate_parses_but_gate_fails() {
        let uid = RuleUid::parse("asam.net:xom:latest:general.valid_schema").unwrap();
        assert!(uid.version_gate().is_err());
    }
}
