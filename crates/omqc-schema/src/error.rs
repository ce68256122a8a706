//! Errors raised while resolving, loading or compiling schemas.

use thiserror::Error;

/// Error during schema resolution or validation.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The file extension is not one the checker has schemas for.
    #[error("unsupported file extension: \"{extension}\" ({path})")]
    UnsupportedExtension {
        /// Lowercased extension including the leading dot, or empty.
        extension: String,
        /// The document path as given.
        path: String,
    },

    /// A resource named by the table is not in the catalog.
    #[error("schema resource not found: {resource}")]
    SchemaNotFound {
        /// Resource identifier, e.g. `1.0.0/asset_schema.json`.
        resource: String,
    },

    /// A schema file could not be parsed.
    #[error("schema load error for '{resource}': {reason}")]
    SchemaLoad {
        /// Resource identifier.
        resource: String,
        /// Why loading failed.
        reason: String,
    },

    /// The jsonschema crate rejected the schema itself.
    #[error("validator build error for schema '{resource}': {reason}")]
    ValidatorBuild {
        /// Resource identifier.
        resource: String,
        /// Compiler message.
        reason: String,
    },

    /// IO error reading a schema file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
