//! # Check Execution
//!
//! Loads schemas, runs the xom bundle on the configured document, and
//! writes the report.

use std::path::Path;

use anyhow::{Context, Result};

use omqc_checker::bundle::BUNDLE_NAME;
use omqc_checker::{run_bundle, write_markdown, xom_pipeline, Driver, InputDocument, Report};
use omqc_schema::SchemaCatalog;

use crate::config::Config;

/// Run the bundle as configured.
///
/// Returns exit code 0 once the report is written, regardless of the
/// issues found.
///
/// # Errors
///
/// Fails if schemas cannot be loaded, the pipeline is misconfigured, or
/// an output file cannot be written.
pub fn run_checks(config: &Config, generate_markdown: bool) -> Result<u8> {
    tracing::info!("Initializing checks");

    let schemas = match &config.schema_dir {
        Some(dir) => SchemaCatalog::from_dir(dir)
            .with_context(|| format!("failed to load schemas from {}", dir.display()))?,
        None => SchemaCatalog::builtin().context("failed to load embedded schemas")?,
    };
    tracing::info!(schema_count = schemas.schema_count(), "loaded schema catalog");

    let driver = Driver::new(schemas).with_strategy(config.location_strategy);
    let document = InputDocument::load(&config.input_file);
    let (result, outcome) = run_bundle(&driver, &document).context("checker pipeline aborted")?;

    tracing::info!(
        schema_version = outcome.schema_version.as_deref().unwrap_or("<undeclared>"),
        summary = %result.summary_line(),
        "bundle finished"
    );

    Report::new(config.params_as_strings())
        .with_bundle(&result)
        .write(&config.result_file)
        .with_context(|| format!("failed to write report {}", config.result_file.display()))?;

    if generate_markdown {
        let dir = config.result_file.parent().unwrap_or_else(|| Path::new(""));
        write_markdown(dir, BUNDLE_NAME, &xom_pipeline())
            .with_context(|| format!("failed to write bundle documentation to {}", dir.display()))?;
    }

    println!("{}", result.summary_line());
    tracing::info!("Done");
    Ok(0)
}
