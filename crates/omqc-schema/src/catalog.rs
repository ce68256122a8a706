//! # Schema Catalog
//!
//! Owns the resolution table and the parsed schema documents it points
//! at. The built-in catalog embeds every schema at compile time so the
//! checker needs no resource directory at runtime; [`SchemaCatalog::from_dir`]
//! reads the same layout (`<version>/<file>.json`) from disk instead.

use std::collections::HashMap;
use std::path::Path;

use jsonschema::Validator;
use serde_json::Value;

use crate::error::SchemaError;
use crate::resolve::SchemaTable;
use crate::validate::{self, Violation};

/// Schema files shipped with the checker, keyed by resource identifier.
const EMBEDDED_SCHEMAS: &[(&str, &str)] = &[
    (
        "1.0.0/asset_schema.json",
        include_str!("../schemas/1.0.0/asset_schema.json"),
    ),
    (
        "1.0.0/mapping_schema.json",
        include_str!("../schemas/1.0.0/mapping_schema.json"),
    ),
    (
        "1.0.0/material_schema.json",
        include_str!("../schemas/1.0.0/material_schema.json"),
    ),
    (
        "1.0.0/material_brdf_schema.json",
        include_str!("../schemas/1.0.0/material_brdf_schema.json"),
    ),
    (
        "1.0.0/material_emp_schema.json",
        include_str!("../schemas/1.0.0/material_emp_schema.json"),
    ),
    (
        "1.0.0/material_optical_schema.json",
        include_str!("../schemas/1.0.0/material_optical_schema.json"),
    ),
    (
        "1.0.0/material_reflCoeff_schema.json",
        include_str!("../schemas/1.0.0/material_reflCoeff_schema.json"),
    ),
];

/// Resolution table plus the schema documents it references.
#[derive(Debug, Clone)]
pub struct SchemaCatalog {
    table: SchemaTable,
    schemas: HashMap<String, Value>,
}

impl SchemaCatalog {
    /// The built-in table with embedded schema documents.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::SchemaLoad`] if an embedded schema is not valid JSON.
    pub fn builtin() -> Result<Self, SchemaError> {
        let mut schemas = HashMap::new();
        for (resource, content) in EMBEDDED_SCHEMAS {
            schemas.insert((*resource).to_string(), parse_schema(resource, content)?);
        }
        Ok(Self {
            table: SchemaTable::builtin(),
            schemas,
        })
    }

    /// The built-in table with schema documents read from `schema_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::SchemaLoad`] if a resource named by the table
    /// is missing from the directory or is not valid JSON.
    pub fn from_dir(schema_dir: impl AsRef<Path>) -> Result<Self, SchemaError> {
        Self::with_table(SchemaTable::builtin(), schema_dir)
    }

    /// A custom table with schema documents read from `schema_dir`.
    ///
    /// # Errors
    ///
    /// See [`SchemaCatalog::from_dir`].
    pub fn with_table(table: SchemaTable, schema_dir: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let schema_dir = schema_dir.as_ref();
        let mut schemas = HashMap::new();

        for resource in table.resources() {
            let path = schema_dir.join(resource);
            let content = std::fs::read_to_string(&path).map_err(|e| SchemaError::SchemaLoad {
                resource: resource.to_string(),
                reason: format!("cannot read {}: {e}", path.display()),
            })?;
            schemas.insert(resource.to_string(), parse_schema(resource, &content)?);
        }

        tracing::debug!(
            schema_dir = %schema_dir.display(),
            schema_count = schemas.len(),
            "loaded schema catalog"
        );

        Ok(Self { table, schemas })
    }

    /// The resolution table.
    pub fn table(&self) -> &SchemaTable {
        &self.table
    }

    /// Resolve the schema resource for a document. See [`SchemaTable::resolve`].
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnsupportedExtension`] for an unknown extension.
    pub fn resolve(&self, version: &str, path: &Path) -> Result<Option<&str>, SchemaError> {
        self.table.resolve(version, path)
    }

    /// Look up a loaded schema by resource identifier.
    pub fn schema(&self, resource: &str) -> Option<&Value> {
        self.schemas.get(resource)
    }

    /// Number of loaded schema documents.
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }

    /// Compile a Draft 7 validator for a loaded resource.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::SchemaNotFound`] or [`SchemaError::ValidatorBuild`].
    pub fn build_validator(&self, resource: &str) -> Result<Validator, SchemaError> {
        let schema = self.schema(resource).ok_or_else(|| SchemaError::SchemaNotFound {
            resource: resource.to_string(),
        })?;
        validate::build_validator(resource, schema, &self.schemas)
    }

    /// Validate `instance` against a loaded resource.
    ///
    /// An empty vector means the document conforms.
    ///
    /// # Errors
    ///
    /// Returns an error only if the schema cannot be found or compiled.
    pub fn validate(&self, resource: &str, instance: &Value) -> Result<Vec<Violation>, SchemaError> {
        let validator = self.build_validator(resource)?;
        Ok(validate::collect_violations(&validator, instance))
    }
}

fn parse_schema(resource: &str, content: &str) -> Result<Value, SchemaError> {
    serde_json::from_str(content).map_err(|e| SchemaError::SchemaLoad {
        resource: resource.to_string(),
        reason: format!("invalid JSON: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_asset() -> Value {
        json!({
            "metadata": {
                "name": "Test asset",
                "uuid": "5b1f3e2a-7c4d-4e8f-9a0b-1c2d3e4f5a6b",
                "openMaterialVersion": "1.0.0"
            }
        })
    }

    #[test]
    fn builtin_loads_every_table_resource() {
        let catalog = SchemaCatalog::builtin().unwrap();
        assert_eq!(catalog.schema_count(), 7);
        for resource in catalog.table().resources() {
            assert!(catalog.schema(resource).is_some(), "missing {resource}");
        }
    }

    #[test]
    fn all_builtin_schemas_compile() {
        let catalog = SchemaCatalog::builtin().unwrap();
        let mut failures = Vec::new();
        for resource in catalog.table().resources() {
            if let Err(e) = catalog.build_validator(resource) {
                failures.push(format!("{resource}: {e}"));
            }
        }
        assert!(failures.is_empty(), "Failed to compile:\n{}", failures.join("\n"));
    }

    #[test]
    fn valid_asset_passes() {
        let catalog = SchemaCatalog::builtin().unwrap();
        let violations = catalog.validate("1.0.0/asset_schema.json", &valid_asset()).unwrap();
        assert!(violations.is_empty(), "{violations:?}");
    }

    #[test]
    fn missing_uuid_is_reported() {
        let catalog = SchemaCatalog::builtin().unwrap();
        let mut doc = valid_asset();
        doc["metadata"].as_object_mut().unwrap().remove("uuid");
        let violations = catalog.validate("1.0.0/asset_schema.json", &doc).unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].instance_path, "/metadata");
        assert!(violations[0].message.contains("uuid"));
    }

    #[test]
    fn unknown_resource_is_not_found() {
        let catalog = SchemaCatalog::builtin().unwrap();
        let err = catalog.validate("2.0.0/asset_schema.json", &json!({})).unwrap_err();
        assert!(matches!(err, SchemaError::SchemaNotFound { .. }));
    }

    #[test]
    fn from_dir_reads_layout() {
        let dir = tempfile::tempdir().unwrap();
        let table = SchemaTable::new().with_entry("1.0.0", "xoma", "1.0.0/asset_schema.json");
        std::fs::create_dir_all(dir.path().join("1.0.0")).unwrap();
        std::fs::write(
            dir.path().join("1.0.0/asset_schema.json"),
            r#"{"type": "object", "required": ["metadata"]}"#,
        )
        .unwrap();

        let catalog = SchemaCatalog::with_table(table, dir.path()).unwrap();
        let violations = catalog.validate("1.0.0/asset_schema.json", &json!({})).unwrap();
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn from_dir_missing_file_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SchemaCatalog::from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, SchemaError::SchemaLoad { .. }));
    }
}
