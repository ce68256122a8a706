#![deny(missing_docs)]

//! # omqc-core — Foundational Types for the OpenMATERIAL Quality Checker
//!
//! This crate defines the types every other crate in the workspace depends
//! on. It has no internal crate dependencies; only `serde`, `serde_json`
//! and `thiserror` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Versions are numbers, not strings.** [`SchemaVersion`] parses a
//!    dotted version into integer components so that `1.10.0 > 1.2.0`.
//!
//! 2. **Rule UIDs are validated at parse time.** A [`RuleUid`] always has
//!    exactly four segments; the version gate is read from the third.
//!
//! 3. **One status lifecycle.** [`Status`] has a single non-terminal value
//!    (`Pending`). Everything a report shows is terminal.
//!
//! 4. **Locations are best-effort.** [`locate`] maps a field path to a
//!    line in the document text by first textual match, never by a full
//!    source map.

pub mod error;
pub mod locate;
pub mod rule_uid;
pub mod status;
pub mod version;

// Re-export primary types at crate root for ergonomic imports.
pub use error::ValidationError;
pub use locate::{
    dotted_path, locate, locate_by_line_scan, locate_in_pretty, resolve, LocateStrategy, PathSegment,
    TextPosition,
};
pub use rule_uid::RuleUid;
pub use status::{IssueSeverity, Status};
pub use version::{compare_versions, SchemaVersion};
