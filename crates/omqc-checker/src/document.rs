//! # Input Document
//!
//! The document under check, loaded once per run. Loading never fails:
//! a missing, unreadable or malformed file is recorded in
//! [`DocumentState`] so that the earliest rules can report it as issues.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::RuleError;

/// Load outcome of an input document.
#[derive(Debug, Clone)]
pub enum DocumentState {
    /// No file exists at the path.
    Missing,
    /// The file exists but could not be read as UTF-8 text.
    Unreadable {
        /// I/O failure message.
        reason: String,
    },
    /// The text is not valid JSON.
    Malformed {
        /// Raw text.
        text: String,
        /// Parser message.
        reason: String,
        /// 1-based line of the parse failure.
        line: usize,
        /// 1-based column of the parse failure.
        column: usize,
    },
    /// Parsed successfully.
    Parsed {
        /// Raw text, as written on disk.
        text: String,
        /// Parsed tree.
        value: Value,
    },
}

/// The document a run is checking.
#[derive(Debug, Clone)]
pub struct InputDocument {
    path: PathBuf,
    state: DocumentState,
}

impl InputDocument {
    /// Read and parse the file at `path`.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = if !path.is_file() {
            DocumentState::Missing
        } else {
            match fs::read_to_string(&path) {
                Ok(text) => parse_state(text),
                Err(e) => DocumentState::Unreadable {
                    reason: e.to_string(),
                },
            }
        };
        tracing::debug!(path = %path.display(), state = state_name(&state), "loaded input document");
        Self { path, state }
    }

    /// Build a document from in-memory text, attributed to `path`.
    pub fn from_text(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            state: parse_state(text.into()),
        }
    }

    /// Path the document was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load outcome.
    pub fn state(&self) -> &DocumentState {
        &self.state
    }

    /// False only for [`DocumentState::Missing`].
    pub fn exists(&self) -> bool {
        !matches!(self.state, DocumentState::Missing)
    }

    /// Raw text, if the file could be read.
    pub fn text(&self) -> Option<&str> {
        match &self.state {
            DocumentState::Malformed { text, .. } | DocumentState::Parsed { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Parsed tree.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::DocumentNotParsed`] unless the state is
    /// [`DocumentState::Parsed`].
    pub fn value(&self) -> Result<&Value, RuleError> {
        match &self.state {
            DocumentState::Parsed { value, .. } => Ok(value),
            other => Err(RuleError::DocumentNotParsed {
                path: self.path.display().to_string(),
                reason: state_name(other).to_string(),
            }),
        }
    }

    /// Directory that relative references inside the document resolve against.
    pub fn base_dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }

    /// Lowercased file extension without the dot.
    pub fn extension(&self) -> Option<String> {
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
    }
}

fn parse_state(text: String) -> DocumentState {
    match serde_json::from_str::<Value>(&text) {
        Ok(value) => DocumentState::Parsed { text, value },
        Err(e) => DocumentState::Malformed {
            reason: e.to_string(),
            line: e.line(),
            column: e.column(),
            text,
        },
    }
}

fn state_name(state: &DocumentState) -> &'static str {
    match state {
        DocumentState::Missing => "missing",
        DocumentState::Unreadable { .. } => "unreadable",
        DocumentState::Malformed { .. } => "malformed",
        DocumentState::Parsed { .. } => "parsed",
    }
}
