//! Detect PHP class references that are used but never imported, declared in
//! the same document, or provided by a sibling file in the same directory.
//!
//! The analysis is a stateless, regex-driven heuristic: [`analyze`] takes one
//! document and returns the complete list of diagnostics for it. Hosts own
//! when to call it and how to render the result.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod extractor;
pub mod lines;
pub mod listing;
pub mod locator;
pub mod names;
pub mod publish;
pub mod types;

pub use analyzer::{analyze, analyze_text};
pub use error::Error;
pub use lines::{LineIndex, LocatedDiagnostic, Position};
pub use listing::{DirectoryListing, FsListing};
pub use publish::DiagnosticCollection;
pub use types::{Diagnostic, Document, FileEntry, Severity};
