//! # Run Configuration
//!
//! YAML file read once at startup:
//!
//! ```yaml
//! input_file: assets/crate.xoma
//! result_file: out/crate_result.json   # default: omqc_result.json
//! schema_dir: schemas                  # default: embedded schemas
//! location_strategy: serialized        # default: line_scan
//! params:
//!   reviewer: qa
//! ```
//!
//! Relative paths are resolved against the directory containing the
//! configuration file.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use omqc_core::LocateStrategy;

use crate::resolve_path;

/// Report file name used when `result_file` is not configured.
pub const DEFAULT_RESULT_FILE: &str = "omqc_result.json";

/// A loaded configuration. Paths are already resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Document to check.
    pub input_file: PathBuf,

    /// Where the JSON report goes.
    #[serde(default = "default_result_file")]
    pub result_file: PathBuf,

    /// Directory overriding the embedded schema resources.
    #[serde(default)]
    pub schema_dir: Option<PathBuf>,

    /// Location heuristic for issue locations.
    #[serde(default)]
    pub location_strategy: LocateStrategy,

    /// Free parameters copied into the report.
    #[serde(default)]
    pub params: BTreeMap<String, serde_yaml::Value>,
}

fn default_result_file() -> PathBuf {
    PathBuf::from(DEFAULT_RESULT_FILE)
}

impl Config {
    /// Read and parse the configuration at `path`.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or is not a valid configuration.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        Self::from_yaml_str(&content, base_dir)
            .with_context(|| format!("invalid config {}", path.display()))
    }

    /// Parse YAML text, resolving relative paths against `base_dir`.
    ///
    /// # Errors
    ///
    /// Fails on malformed YAML, unknown keys or a missing `input_file`.
    pub fn from_yaml_str(content: &str, base_dir: &Path) -> Result<Self> {
        let mut config: Config = serde_yaml::from_str(content)?;
        config.input_file = resolve_path(&config.input_file, base_dir);
        config.result_file = resolve_path(&config.result_file, base_dir);
        config.schema_dir = config.schema_dir.map(|dir| resolve_path(&dir, base_dir));
        Ok(config)
    }

    /// Parameters rendered as strings for the report.
    pub fn params_as_strings(&self) -> BTreeMap<String, String> {
        self.params
            .iter()
            .map(|(key, value)| (key.clone(), scalar_to_string(value)))
            .collect()
    }
}

fn scalar_to_string(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Null => String::new(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply() {
        let config = Config::from_yaml_str("input_file: crate.xoma\n", Path::new("/work")).unwrap();
        assert_eq!(config.input_file, PathBuf::from("/work/crate.xoma"));
        assert_eq!(config.result_file, PathBuf::from("/work").join(DEFAULT_RESULT_FILE));
        assert_eq!(config.schema_dir, None);
        assert_eq!(config.location_strategy, LocateStrategy::LineScan);
        assert!(config.params.is_empty());
    }

    #[test]
    fn all_fields() {
        let yaml = "\
input_file: in/crate.xoma
result_file: out/result.json
schema_dir: schemas
location_strategy: serialized
params:
  reviewer: qa
  strict: true
  retries: 3
";
        let config = Config::from_yaml_str(yaml, Path::new("/work")).unwrap();
        assert_eq!(config.result_file, PathBuf::from("/work/out/result.json"));
        assert_eq!(config.schema_dir, Some(PathBuf::from("/work/schemas")));
        assert_eq!(config.location_strategy, LocateStrategy::Serialized);

        let params = config.params_as_strings();
        assert_eq!(params["reviewer"], "qa");
        assert_eq!(params["strict"], "true");
        assert_eq!(params["retries"], "3");
    }

    #[test]
    fn input_file_is_required() {
        assert!(Config::from_yaml_str("result_file: r.json\n", Path::new(".")).is_err());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let yaml = "input_file: a.xoma\ninputfile: b.xoma\n";
        assert!(Config::from_yaml_str(yaml, Path::new(".")).is_err());
    }

    #[test]
    fn load_resolves_against_config_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("check.yaml");
        fs::write(&path, "input_file: crate.xoma\n").unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.input_file, dir.path().join("crate.xoma"));
    }

    #[test]
    fn missing_config_file_names_path() {
        let err = Config::load(Path::new("/nonexistent/check.yaml")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/check.yaml"));
    }
}
