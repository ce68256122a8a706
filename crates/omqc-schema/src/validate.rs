//! # Schema Validation
//!
//! Draft 7 evaluation of a document against one catalog resource.
//!
//! Cross-schema `$ref`s are resolved against the other catalog documents
//! by `$id` or by resource suffix. Nothing is fetched over the network:
//! an unknown reference resolves to the permissive schema `{}`.

use std::collections::HashMap;
use std::fmt;

use jsonschema::{Retrieve, Uri, ValidationOptions, Validator};
use serde_json::Value;

use omqc_core::{dotted_path, PathSegment};

use crate::error::SchemaError;

/// Local retriever over the catalog documents.
struct CatalogRetriever {
    /// Map from `$id` or resource identifier to schema value.
    schemas_by_uri: HashMap<String, Value>,
}

impl Retrieve for CatalogRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();

        if let Some(value) = self.schemas_by_uri.get(uri_str) {
            return Ok(value.clone());
        }

        if let Some((_, value)) = self
            .schemas_by_uri
            .iter()
            .find(|(key, _)| uri_str.ends_with(key.as_str()))
        {
            return Ok(value.clone());
        }

        tracing::warn!(uri = uri_str, "unresolved schema reference, treating as permissive");
        Ok(serde_json::json!({}))
    }
}

/// A single schema violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer to the violating value in the instance.
    pub instance_path: String,
    /// JSON Pointer to the schema keyword that failed.
    pub schema_path: String,
    /// Human-readable description.
    pub message: String,
}

impl Violation {
    /// The instance path as typed segments, resolved against `instance`.
    pub fn path_segments(&self, instance: &Value) -> Vec<PathSegment> {
        PathSegment::from_pointer(&self.instance_path, instance)
    }

    /// The instance path in dotted form, e.g. `metadata.authors[0]`.
    pub fn dotted_path(&self, instance: &Value) -> String {
        dotted_path(&self.path_segments(instance))
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.instance_path, self.message)
        }
    }
}

fn build_options(schemas: &HashMap<String, Value>) -> ValidationOptions {
    let mut opts = jsonschema::options();
    opts.with_draft(jsonschema::Draft::Draft7);

    let mut schemas_by_uri: HashMap<String, Value> = HashMap::new();
    for (resource, value) in schemas {
        schemas_by_uri.insert(resource.clone(), value.clone());
        if let Some(id) = value.get("$id").and_then(|v| v.as_str()) {
            schemas_by_uri.insert(id.to_string(), value.clone());
        }
    }
    opts.with_retriever(CatalogRetriever { schemas_by_uri });

    opts
}

/// Compile `schema` with the rest of the catalog available for `$ref`s.
pub(crate) fn build_validator(
    resource: &str,
    schema: &Value,
    catalog: &HashMap<String, Value>,
) -> Result<Validator, SchemaError> {
    build_options(catalog)
        .build(schema)
        .map_err(|e| SchemaError::ValidatorBuild {
            resource: resource.to_string(),
            reason: e.to_string(),
        })
}

/// Every violation of `instance`, sorted by instance path segment by
/// segment, with array indices compared as numbers.
pub(crate) fn collect_violations(validator: &Validator, instance: &Value) -> Vec<Violation> {
    let mut violations: Vec<Violation> = validator
        .iter_errors(instance)
        .map(|e| Violation {
            instance_path: e.instance_path.to_string(),
            schema_path: e.schema_path.to_string(),
            message: e.to_string(),
        })
        .collect();
    violations.sort_by_cached_key(|v| v.path_segments(instance));
    violations
}
