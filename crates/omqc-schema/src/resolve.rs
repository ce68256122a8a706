//! # Schema Resolution
//!
//! Builds a [`SchemaKey`] from the declared schema version and the file
//! kind of the document, then looks it up in a [`SchemaTable`].
//!
//! The file kind is the lowercased extension without the dot. `.xompt`
//! is the one polymorphic extension: a material table file carries its
//! table type as the last `_`-separated part of the file stem, so
//! `glass_brdf.xompt` and `glass_optical.xompt` resolve to different
//! schemas under the same extension.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::error::SchemaError;

/// Extensions the checker has schemas for, without the dot.
pub const RECOGNIZED_EXTENSIONS: [&str; 4] = ["xoma", "xomm", "xomp", "xompt"];

/// The extension whose kind embeds a suffix taken from the file name.
const TABLE_EXTENSION: &str = "xompt";

/// Lookup key into a [`SchemaTable`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaKey {
    /// Declared schema version, compared as a plain string.
    pub version: String,
    /// File kind, e.g. `xoma` or `brdf.xompt`.
    pub kind: String,
}

impl SchemaKey {
    /// Build a key for the document at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnsupportedExtension`] if the extension is not recognized.
    pub fn for_path(version: &str, path: &Path) -> Result<Self, SchemaError> {
        Ok(Self {
            version: version.to_string(),
            kind: file_kind(path)?,
        })
    }
}

impl fmt::Display for SchemaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.version, self.kind)
    }
}

/// Derive the schema kind of a document from its path.
///
/// # Errors
///
/// Returns [`SchemaError::UnsupportedExtension`] if the extension is
/// missing or not in [`RECOGNIZED_EXTENSIONS`].
pub fn file_kind(path: &Path) -> Result<String, SchemaError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if !RECOGNIZED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(SchemaError::UnsupportedExtension {
            extension: if extension.is_empty() {
                String::new()
            } else {
                format!(".{extension}")
            },
            path: path.display().to_string(),
        });
    }

    if extension == TABLE_EXTENSION {
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
        let suffix = stem.rsplit('_').next().unwrap_or(stem);
        return Ok(format!("{suffix}.{TABLE_EXTENSION}"));
    }

    Ok(extension)
}

/// Immutable mapping from [`SchemaKey`] to schema resource identifier.
#[derive(Debug, Clone, Default)]
pub struct SchemaTable {
    entries: BTreeMap<SchemaKey, String>,
}

impl SchemaTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The table for every schema version this checker ships.
    pub fn builtin() -> Self {
        [
            ("xoma", "1.0.0/asset_schema.json"),
            ("xomm", "1.0.0/mapping_schema.json"),
            ("xomp", "1.0.0/material_schema.json"),
            ("brdf.xompt", "1.0.0/material_brdf_schema.json"),
            ("emp.xompt", "1.0.0/material_emp_schema.json"),
            ("optical.xompt", "1.0.0/material_optical_schema.json"),
            ("reflCoeff.xompt", "1.0.0/material_reflCoeff_schema.json"),
        ]
        .into_iter()
        .fold(Self::new(), |table, (kind, resource)| {
            table.with_entry("1.0.0", kind, resource)
        })
    }

    /// Add an entry, replacing any previous resource for the same key.
    pub fn with_entry(mut self, version: &str, kind: &str, resource: &str) -> Self {
        self.entries.insert(
            SchemaKey {
                version: version.to_string(),
                kind: kind.to_string(),
            },
            resource.to_string(),
        );
        self
    }

    /// Look up a key directly.
    pub fn get(&self, key: &SchemaKey) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Resolve the schema resource for a document.
    ///
    /// `Ok(None)` means the version is not mapped: callers should skip.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnsupportedExtension`] for an unknown extension.
    pub fn resolve(&self, version: &str, path: &Path) -> Result<Option<&str>, SchemaError> {
        let key = SchemaKey::for_path(version, path)?;
        let resource = self.get(&key);
        tracing::debug!(%key, ?resource, "resolved schema key");
        Ok(resource)
    }

    /// Every resource identifier in the table, deduplicated, sorted.
    pub fn resources(&self) -> Vec<&str> {
        let mut resources: Vec<&str> = self.entries.values().map(String::as_str).collect();
        resources.sort_unstable();
        resources.dedup();
        resources
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the table has no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
