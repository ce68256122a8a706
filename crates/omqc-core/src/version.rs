//! # Schema Version Ordering
//!
//! Dotted numeric versions such as `1.0.0` compared component by component.
//! Comparing the strings lexicographically would misorder `1.10.0` and
//! `1.2.0`; [`SchemaVersion`] holds the parsed integers instead.
//!
//! When all shared components are equal, the version with more components
//! is the greater one: `1.0 < 1.0.0`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A parsed dotted version with at least one numeric component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SchemaVersion(Vec<u64>);

impl SchemaVersion {
    /// Parse a version string.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidVersion`] if the string is empty or
    /// any component is not a run of ASCII digits.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        if value.is_empty() {
            return Err(ValidationError::InvalidVersion {
                value: value.to_string(),
                reason: "empty version string".to_string(),
            });
        }

        let components = value
            .split('.')
            .map(|component| {
                if component.is_empty() || !component.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(ValidationError::InvalidVersion {
                        value: value.to_string(),
                        reason: format!("component \"{component}\" is not a number"),
                    });
                }
                component.parse::<u64>().map_err(|e| ValidationError::InvalidVersion {
                    value: value.to_string(),
                    reason: format!("component \"{component}\": {e}"),
                })
            })
            .collect::<Result<Vec<u64>, _>>()?;

        Ok(Self(components))
    }

    /// The numeric components, most significant first.
    pub fn components(&self) -> &[u64] {
        &self.0
    }
}

impl FromStr for SchemaVersion {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SchemaVersion {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SchemaVersion> for String {
    fn from(version: SchemaVersion) -> Self {
        version.to_string()
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, component) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{component}")?;
        }
        Ok(())
    }
}

/// Compare two dotted version strings.
///
/// Returns `Greater` if `a` is the newer version. Neither input is
/// pre-validated; a non-numeric component fails the comparison.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidVersion`] for whichever input does not parse.
pub fn compare_versions(a: &str, b: &str) -> Result<Ordering, ValidationError> {
    Ok(SchemaVersion::parse(a)?.cmp(&SchemaVersion::parse(b)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn numeric_not_lexicographic() {
        assert_eq!(compare_versions("1.10.0", "1.2.0").unwrap(), Ordering::Greater);
        assert_eq!(compare_versions("1.2.0", "1.10.0").unwrap(), Ordering::Less);
    }

    #[test]
    fn equal_versions() {
        assert_eq!(compare_versions("1.0.0", "1.0.0").unwrap(), Ordering::Equal);
    }

    #[test]
    fn shorter_prefix_is_lower() {
        assert_eq!(compare_versions("1.0", "1.0.0").unwrap(), Ordering::Less);
        assert_eq!(compare_versions("1.0.0", "1.0").unwrap(), Ordering::Greater);
    }

    #[test]
    fn major_dominates() {
        assert_eq!(compare_versions("2.0.0", "1.9.9").unwrap(), Ordering::Greater);
    }

    #[test]
    fn non_numeric_component_rejected() {
        let err = compare_versions("1.x.0", "1.0.0").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidVersion { .. }));
        assert!(compare_versions("1.0.0", "").is_err());
        assert!(compare_versions("1..0", "1.0.0").is_err());
        assert!(compare_versions("+1.0", "1.0").is_err());
    }

    #[test]
    fn display_normalizes_leading_zeros() {
        let v = SchemaVersion::parse("01.002.3").unwrap();
        assert_eq!(v.to_string(), "1.2.3");
        assert_eq!(v.components(), &[1, 2, 3]);
    }

    #[test]
    fn serde_uses_string_form() {
        let v: SchemaVersion = serde_json::from_str("\"1.2.0\"").unwrap();
        assert_eq!(v, SchemaVersion::parse("1.2.0").unwrap());
        assert_eq!(serde_json::to_string(&v).unwrap(), "\"1.2.0\"");
        assert!(serde_json::from_str::<SchemaVersion>("\"one\"").is_err());
    }

    fn version_string() -> impl Strategy<Value = String> {
        prop::collection::vec(0u64..50, 1..5).prop_map(|parts| {
            parts.iter().map(|p| p.to_string()).collect::<Vec<_>>().join(".")
        })
    }

    proptest! {
        /// Comparison is antisymmetric.
        #[test]
        fn compare_antisymmetric(a in version_string(), b in version_string()) {
            let ab = compare_versions(&a, &b).unwrap();
            let ba = compare_versions(&b, &a).unwrap();
            prop_assert_eq!(ab, ba.reverse());
        }

        /// Every version compares equal to itself.
        #[test]
        fn compare_reflexive(a in version_string()) {
            prop_assert_eq!(compare_versions(&a, &a).unwrap(), Ordering::Equal);
        }

        /// Appending a component always yields a greater version.
        #[test]
        fn extension_is_greater(a in version_string(), extra in 0u64..50) {
            let longer = format!("{a}.{extra}");
            prop_assert_eq!(compare_versions(&longer, &a).unwrap(), Ordering::Greater);
        }
    }
}
