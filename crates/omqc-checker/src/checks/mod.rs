//! Concrete checkers of the xom bundle.
//!
//! `general` holds the rules that apply to every document kind; `xoma`
//! holds the asset-only rules.

pub mod general;
pub mod xoma;

pub use general::{UrisExist, ValidJsonDocument, ValidSchema, VersionIsDefined};
pub use xoma::{MaterialTexturesExist, TextureAssignmentRequiresMapping};

/// Checker ids every content rule depends on: a parseable document with a
/// declared version that conforms to its schema.
pub const BASIC_PRECONDITIONS: [&str; 3] = [
    general::ValidJsonDocument::CHECKER_ID,
    general::VersionIsDefined::CHECKER_ID,
    general::ValidSchema::CHECKER_ID,
];
