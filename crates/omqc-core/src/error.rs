//! # Validation Errors
//!
//! Structured errors for the core primitives, built with `thiserror`.
//! Each variant carries the offending input so that a misconfigured rule
//! or a malformed document can be diagnosed from the message alone.

use thiserror::Error;

/// Validation errors for core primitive types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Version string is not a dot-separated list of non-negative integers.
    #[error("invalid version \"{value}\": {reason}")]
    InvalidVersion {
        /// The string that failed to parse.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Rule UID does not have the `namespace:domain:version:category.name` shape.
    #[error("invalid rule uid \"{value}\": expected 4 colon-separated segments, found {segments}")]
    InvalidRuleUid {
        /// The rule UID as declared.
        value: String,
        /// Number of segments actually present.
        segments: usize,
    },
}
