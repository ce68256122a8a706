//! # omqc-cli — OpenMATERIAL 3D Quality Checker
//!
//! Provides the `omqc` command-line interface:
//!
//! ```bash
//! omqc --config check.yaml
//! omqc --config check.yaml --generate-markdown -vv
//! ```
//!
//! The configuration names the input document and the report
//! destination; see [`config::Config`]. Exit code `0` means the bundle ran
//! to the end, whatever it found. Exit code `1` means the run could not
//! complete.

pub mod config;
pub mod run;

use std::path::{Path, PathBuf};

/// Resolve `path` against `base_dir` unless it is already absolute.
pub fn resolve_path(path: &Path, base_dir: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}
