//! # xom Bundle End to End
//!
//! Runs the full bundle against documents written to a temporary
//! directory and checks the terminal status of every checker.

use std::fs;
use std::path::{Path, PathBuf};

use omqc_checker::checks::{
    MaterialTexturesExist, TextureAssignmentRequiresMapping, UrisExist, ValidJsonDocument,
    ValidSchema, VersionIsDefined,
};
use omqc_checker::{run_bundle, BundleResult, DocumentState, Driver, InputDocument, Report};
use omqc_core::{LocateStrategy, Status};
use omqc_schema::SchemaCatalog;
use serde_json::{json, Value};

fn driver() -> Driver {
    Driver::new(SchemaCatalog::builtin().unwrap())
}

fn write_doc(dir: &Path, name: &str, value: &Value) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path
}

fn asset(version: &str) -> Value {
    json!({
        "metadata": {
            "name": "crate",
            "uuid": "0f8fad5b-d9cb-469f-a165-70867728950e",
            "openMaterialVersion": version
        },
        "geometryUri": "crate.glb"
    })
}

fn assert_no_pending(result: &BundleResult) {
    assert!(result.pending_checkers().is_empty(), "{:?}", result.pending_checkers());
    assert_eq!(result.checkers().len(), 6);
}

#[test]
fn clean_asset_completes_every_check() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("crate.glb"), b"glTF").unwrap();
    let path = write_doc(dir.path(), "crate.xoma", &asset("1.0.0"));

    let (result, outcome) = run_bundle(&driver(), &InputDocument::load(&path)).unwrap();
    assert_no_pending(&result);
    assert_eq!(outcome.schema_version.as_deref(), Some("1.0.0"));
    assert_eq!(outcome.completed, 6);
    assert!(result.issues().is_empty(), "{:?}", result.issues());
}

#[test]
fn missing_file_skips_everything_downstream() {
    let dir = tempfile::tempdir().unwrap();
    let doc = InputDocument::load(dir.path().join("absent.xoma"));
    let (result, outcome) = run_bundle(&driver(), &doc).unwrap();

    assert_no_pending(&result);
    assert_eq!(result.get_status(ValidJsonDocument::CHECKER_ID), Some(Status::Completed));
    assert_eq!(result.issue_count(ValidJsonDocument::CHECKER_ID), 1);
    for id in [
        VersionIsDefined::CHECKER_ID,
        ValidSchema::CHECKER_ID,
        UrisExist::CHECKER_ID,
        MaterialTexturesExist::CHECKER_ID,
        TextureAssignmentRequiresMapping::CHECKER_ID,
    ] {
        assert_eq!(result.get_status(id), Some(Status::Skipped), "{id}");
        assert!(!result.checker(id).unwrap().summary.is_empty());
    }
    assert_eq!(outcome.schema_version, None);
}

#[test]
fn non_utf8_file_is_reported_and_gates_downstream() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("crate.xoma");
    fs::write(&path, [0xff, 0xfe, b'{', 0xc3, b'}']).unwrap();
    let doc = InputDocument::load(&path);
    assert!(matches!(doc.state(), DocumentState::Unreadable { .. }));

    let (result, outcome) = run_bundle(&driver(), &doc).unwrap();
    assert_no_pending(&result);
    assert_eq!(result.get_status(ValidJsonDocument::CHECKER_ID), Some(Status::Completed));
    let issues: Vec<_> = result.issues_of(ValidJsonDocument::CHECKER_ID).collect();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].description, "The input file is not a valid json file.");
    for record in &result.checkers()[1..] {
        assert_eq!(record.status, Status::Skipped, "{}", record.checker_id);
    }
    assert_eq!(outcome.schema_version, None);
}

#[test]
fn missing_version_leaves_schema_undeclared() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_doc(dir.path(), "crate.xoma", &json!({"metadata": {"name": "crate"}}));
    let (result, outcome) = run_bundle(&driver(), &InputDocument::load(&path)).unwrap();

    assert_no_pending(&result);
    assert_eq!(result.get_status(VersionIsDefined::CHECKER_ID), Some(Status::Completed));
    assert_eq!(result.issue_count(VersionIsDefined::CHECKER_ID), 1);
    assert_eq!(result.get_status(ValidSchema::CHECKER_ID), Some(Status::Skipped));
    assert_eq!(outcome.schema_version, None);
}

#[test]
fn schema_findings_gate_content_checks() {
    let dir = tempfile::tempdir().unwrap();
    let mut value = asset("1.0.0");
    value["metadata"]["uuid"] = json!("not-a-uuid");
    let path = write_doc(dir.path(), "crate.xoma", &value);
    let (result, _) = run_bundle(&driver(), &InputDocument::load(&path)).unwrap();

    assert_no_pending(&result);
    assert_eq!(result.get_status(ValidSchema::CHECKER_ID), Some(Status::Completed));
    let issues = result.issues_by_rule_uid(ValidSchema::RULE_UID);
    assert_eq!(issues.len(), 1);
    assert!(issues[0].description.starts_with("Error in metadata.uuid: "));
    let text = fs::read_to_string(&path).unwrap();
    let uuid_row = text.lines().position(|l| l.contains("\"uuid\"")).unwrap() + 1;
    assert_eq!(issues[0].locations[0].row, uuid_row);
    assert_eq!(result.get_status(UrisExist::CHECKER_ID), Some(Status::Skipped));
}

#[test]
fn old_version_skips_gated_checks() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_doc(dir.path(), "crate.xoma", &asset("0.9.0"));
    let (result, outcome) = run_bundle(&driver(), &InputDocument::load(&path)).unwrap();

    assert_no_pending(&result);
    assert_eq!(outcome.schema_version.as_deref(), Some("0.9.0"));
    let summary = &result.checker(ValidSchema::CHECKER_ID).unwrap().summary;
    assert_eq!(
        summary,
        &vec!["Version 0.9.0 is lower than definition setting 1.0.0. Skip the check.".to_string()]
    );
}

#[test]
fn unmapped_newer_version_skips_schema_check() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_doc(dir.path(), "crate.xoma", &asset("1.2.0"));
    let (result, _) = run_bundle(&driver(), &InputDocument::load(&path)).unwrap();

    assert_no_pending(&result);
    assert_eq!(result.get_status(ValidSchema::CHECKER_ID), Some(Status::Skipped));
    assert_eq!(result.get_status(UrisExist::CHECKER_ID), Some(Status::Skipped));
}

#[test]
fn unsupported_extension_errors_only_the_schema_check() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_doc(dir.path(), "crate.json", &asset("1.0.0"));
    let (result, outcome) = run_bundle(&driver(), &InputDocument::load(&path)).unwrap();

    assert_no_pending(&result);
    assert_eq!(result.get_status(ValidSchema::CHECKER_ID), Some(Status::Error));
    let summary = &result.checker(ValidSchema::CHECKER_ID).unwrap().summary[0];
    assert!(summary.starts_with("Error: unsupported file extension"), "{summary}");
    assert_eq!(outcome.errored, 1);
}

#[test]
fn texture_table_resolves_by_file_suffix() {
    let dir = tempfile::tempdir().unwrap();
    let value = json!({
        "metadata": {
            "name": "glass",
            "uuid": "0f8fad5b-d9cb-469f-a165-70867728950e",
            "openMaterialVersion": "1.0.0"
        }
    });
    let path = write_doc(dir.path(), "glass_brdf.xompt", &value);
    let (result, _) = run_bundle(&driver(), &InputDocument::load(&path)).unwrap();

    let issues = result.issues_by_rule_uid(ValidSchema::RULE_UID);
    assert!(!issues.is_empty());
    assert!(issues.iter().any(|i| i.description.contains("data")));
}

#[test]
fn asset_texture_rules_report_with_locations() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("crate.glb"), b"glTF").unwrap();
    let mut value = asset("1.0.0");
    value["materialTextureAssignment"] = json!([["wood", "wood_albedo.png"]]);
    let path = write_doc(dir.path(), "crate.xoma", &value);
    let (result, _) = run_bundle(&driver(), &InputDocument::load(&path)).unwrap();

    assert_no_pending(&result);
    assert_eq!(result.issue_count(MaterialTexturesExist::CHECKER_ID), 1);
    assert_eq!(result.issue_count(TextureAssignmentRequiresMapping::CHECKER_ID), 1);
    for issue in result.issues() {
        assert_eq!(issue.locations.len(), 1);
    }
}

#[test]
fn serialized_strategy_reports_columns() {
    let dir = tempfile::tempdir().unwrap();
    let mut value = asset("1.0.0");
    value["metadata"]["name"] = json!("");
    let path = write_doc(dir.path(), "crate.xoma", &value);
    let driver = driver().with_strategy(LocateStrategy::Serialized);
    let (result, _) = run_bundle(&driver, &InputDocument::load(&path)).unwrap();

    let issue = &result.issues_by_rule_uid(ValidSchema::RULE_UID)[0];
    assert_eq!(issue.locations[0].column, 4);
}

#[test]
fn report_round_trips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let doc = InputDocument::load(dir.path().join("absent.xoma"));
    let (result, _) = run_bundle(&driver(), &doc).unwrap();

    let out = dir.path().join("result.json");
    Report::new(Default::default()).with_bundle(&result).write(&out).unwrap();
    let report = Report::read(&out).unwrap();
    let checker = report.checker(ValidJsonDocument::CHECKER_ID).unwrap();
    assert_eq!(checker.status, Status::Completed);
    assert_eq!(checker.issues[0].description, "The input file does not exist.");
}
