//! # Source Location Mapping
//!
//! Maps a field path inside a parsed document to a 1-based row (and a
//! best-effort column) in a textual form of that document.
//!
//! Two strategies share one contract:
//!
//! - [`LocateStrategy::LineScan`] scans the raw text for the quoted first
//!   key, then for each further key from that line onward. The column is
//!   always 0.
//! - [`LocateStrategy::Serialized`] resolves the path in the parsed tree,
//!   serializes the target compactly and searches the pretty-printed
//!   document for it. The column is the 0-based character offset.
//!
//! Both are textual heuristics. A key name that repeats earlier in the
//! document (nested objects reusing a field name) matches the first
//! occurrence. Neither strategy ever fails: an unresolvable path yields
//! `None`.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One step of a field path.
///
/// Ordering compares indices numerically, so `[2]` sorts before `[10]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathSegment {
    /// Object member name.
    Key(String),
    /// Array position.
    Index(usize),
}

impl PathSegment {
    /// Convert a JSON Pointer (RFC 6901) into typed segments.
    ///
    /// The pointer is walked against `document` so that a numeric segment
    /// becomes an [`PathSegment::Index`] only where the document holds an
    /// array. Once the walk leaves the document, remaining segments are keys.
    pub fn from_pointer(pointer: &str, document: &Value) -> Vec<PathSegment> {
        if pointer.is_empty() {
            return Vec::new();
        }

        let mut current = Some(document);
        pointer
            .split('/')
            .skip(1)
            .map(|raw| {
                let token = raw.replace("~1", "/").replace("~0", "~");
                let segment = match (current, token.parse::<usize>()) {
                    (Some(Value::Array(_)), Ok(index)) => PathSegment::Index(index),
                    _ => PathSegment::Key(token),
                };
                current = current.and_then(|value| step(value, &segment));
                segment
            })
            .collect()
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Render a path the way reports show it: `metadata.textures[0].uri`.
pub fn dotted_path(path: &[PathSegment]) -> String {
    let mut out = String::new();
    for segment in path {
        match segment {
            PathSegment::Key(key) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(key);
            }
            PathSegment::Index(index) => {
                out.push_str(&format!("[{index}]"));
            }
        }
    }
    out
}

/// A row/column anchor in document text. `row` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextPosition {
    /// 1-based line number.
    pub row: usize,
    /// Column within the line; 0 when unknown.
    pub column: usize,
}

/// Which location heuristic to apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocateStrategy {
    /// Search the raw text key by key.
    #[default]
    LineScan,
    /// Search the pretty-printed serialization for the resolved value.
    Serialized,
}

/// Locate `path` using the given strategy.
///
/// `text` is the raw document text; it is only read by the line-scan
/// strategy, while the serialized strategy regenerates its own text from
/// `document`.
pub fn locate(
    strategy: LocateStrategy,
    document: &Value,
    text: &str,
    path: &[PathSegment],
) -> Option<TextPosition> {
    match strategy {
        LocateStrategy::LineScan => locate_by_line_scan(text, path),
        LocateStrategy::Serialized => locate_in_pretty(document, path),
    }
}

/// Resolve `path` in the parsed tree.
pub fn resolve<'a>(document: &'a Value, path: &[PathSegment]) -> Option<&'a Value> {
    path.iter().try_fold(document, step)
}

fn step<'a>(value: &'a Value, segment: &PathSegment) -> Option<&'a Value> {
    match (value, segment) {
        (Value::Object(map), PathSegment::Key(key)) => map.get(key),
        (Value::Array(items), PathSegment::Index(index)) => items.get(*index),
        _ => None,
    }
}

/// Serialize-and-search strategy.
///
/// The search needle is the compact serialization of the resolved value,
/// prefixed with `"key": ` when the last segment is a key. A non-empty
/// container spans several pretty-printed lines, so only its opening
/// bracket takes part in the needle.
pub fn locate_in_pretty(document: &Value, path: &[PathSegment]) -> Option<TextPosition> {
    let target = resolve(document, path)?;
    let pretty = serde_json::to_string_pretty(document).ok()?;

    let value_text = match target {
        Value::Object(map) if !map.is_empty() => "{".to_string(),
        Value::Array(items) if !items.is_empty() => "[".to_string(),
        scalar => serde_json::to_string(scalar).ok()?,
    };
    let needle = match path.last() {
        Some(PathSegment::Key(key)) => format!("{}: {value_text}", serde_json::to_string(key).ok()?),
        _ => value_text,
    };

    pretty.lines().enumerate().find_map(|(index, line)| {
        line.find(&needle).map(|byte_offset| TextPosition {
            row: index + 1,
            column: line[..byte_offset].chars().count(),
        })
    })
}

/// Line-scan strategy.
///
/// Each key segment is searched as a quoted string from the current line
/// onward (the current line included); index segments have no textual
/// form and leave the cursor in place.
pub fn locate_by_line_scan(text: &str, path: &[PathSegment]) -> Option<TextPosition> {
    let lines: Vec<&str> = text.lines().collect();
    let mut cursor = 0usize;

    for segment in path {
        let PathSegment::Key(key) = segment else {
            continue;
        };
        let needle = serde_json::to_string(key).ok()?;
        let offset = lines
            .get(cursor..)?
            .iter()
            .position(|line| line.contains(&needle))?;
        cursor += offset;
    }

    Some(TextPosition {
        row: cursor + 1,
        column: 0,
    })
}
