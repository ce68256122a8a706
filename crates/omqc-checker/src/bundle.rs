//! # The xom Checker Bundle
//!
//! Assembles the concrete rules into their fixed pipeline order. The
//! schema version is declared once the document is known to parse and
//! to carry a version string.

use crate::checks::{
    MaterialTexturesExist, TextureAssignmentRequiresMapping, UrisExist, ValidJsonDocument,
    ValidSchema, VersionIsDefined,
};
use crate::document::InputDocument;
use crate::driver::{Driver, Pipeline, RunOutcome};
use crate::error::DriverError;
use crate::result::BundleResult;

/// Bundle name written to reports.
pub const BUNDLE_NAME: &str = "xomBundle";

/// Bundle version written to reports.
pub const BUNDLE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Bundle description written to reports.
pub const BUNDLE_DESCRIPTION: &str = "OpenMATERIAL 3D checker bundle";

/// Where the declared schema version lives in a document.
pub const VERSION_POINTER: &str = "/metadata/openMaterialVersion";

/// The rules of the bundle in execution order.
pub fn xom_pipeline() -> Pipeline {
    Pipeline::new()
        .rule(ValidJsonDocument)
        .rule(VersionIsDefined)
        .declare_version(
            [ValidJsonDocument::CHECKER_ID, VersionIsDefined::CHECKER_ID],
            VERSION_POINTER,
        )
        .rule(ValidSchema)
        .rule(UrisExist)
        .rule(MaterialTexturesExist)
        .rule(TextureAssignmentRequiresMapping)
}

/// An empty result for this bundle.
pub fn new_result() -> BundleResult {
    BundleResult::new(BUNDLE_NAME, BUNDLE_DESCRIPTION, BUNDLE_VERSION)
}

/// Run the bundle against `document`.
///
/// # Errors
///
/// Propagates fatal pipeline configuration errors.
pub fn run_bundle(
    driver: &Driver,
    document: &InputDocument,
) -> Result<(BundleResult, RunOutcome), DriverError> {
    let pipeline = xom_pipeline();
    let mut result = new_result();
    let outcome = driver.run(&pipeline, document, &mut result)?;
    Ok((result, outcome))
}
