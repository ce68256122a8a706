//! # omqc-schema — Schema Resolution & Validation
//!
//! Maps a document to the schema resource that governs it and evaluates
//! the document against that schema.
//!
//! ## Resolution (`resolve`)
//!
//! [`SchemaTable`] is an explicit, immutable `(version, kind) → resource`
//! table. The kind is the file extension, except for `.xompt` tables
//! whose kind also carries the suffix after the last `_` in the file name
//! (`glass_brdf.xompt` → `brdf.xompt`). An unknown version resolves to
//! `None`; an unknown extension is an [`SchemaError::UnsupportedExtension`].
//!
//! ## Catalog (`catalog`)
//!
//! [`SchemaCatalog`] owns the parsed schema documents, either embedded at
//! compile time or read from a directory with the same layout.
//!
//! ## Validation (`validate`)
//!
//! Schema evaluation is delegated to the `jsonschema` crate (Draft 7).
//! Violations come back sorted by instance path.

pub mod catalog;
pub mod error;
pub mod resolve;
pub mod validate;

pub use catalog::SchemaCatalog;
pub use error::SchemaError;
pub use resolve::{file_kind, SchemaKey, SchemaTable, RECOGNIZED_EXTENSIONS};
pub use validate::Violation;
