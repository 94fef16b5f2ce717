//! Per-document diagnostic store with replace-on-publish semantics.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::lines::LocatedDiagnostic;
use crate::types::Severity;

/// Published diagnostics keyed by document path, iterated in path order.
///
/// The analyzer returns a complete list per call; publishing replaces
/// whatever was stored for that document before.
#[derive(Debug, Default)]
pub struct DiagnosticCollection {
    /// Current diagnostics per document. Documents with none are not stored.
    documents: BTreeMap<PathBuf, Vec<LocatedDiagnostic>>,
}

impl DiagnosticCollection {
    /// Total diagnostics with `Severity::Error` across all documents.
    pub fn error_count(&self) -> usize {
        return self
            .iter()
            .flat_map(|(_, diagnostics)| return diagnostics)
            .filter(|d| return d.diagnostic.severity == Severity::Error)
            .count();
    }

    /// Diagnostics currently published for `path`.
    pub fn get(&self, path: &Path) -> &[LocatedDiagnostic] {
        return self.documents.get(path).map(Vec::as_slice).unwrap_or_default();
    }

    /// Documents with at least one diagnostic, in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &[LocatedDiagnostic])> {
        return self
            .documents
            .iter()
            .map(|(path, diagnostics)| return (path.as_path(), diagnostics.as_slice()));
    }

    /// Create an empty collection.
    pub fn new() -> Self {
        return Self::default();
    }

    /// Replace the diagnostics for `path`. An empty list clears the document.
    pub fn publish(&mut self, path: &Path, diagnostics: Vec<LocatedDiagnostic>) {
        if diagnostics.is_empty() {
            self.documents.remove(path);
        } else {
            self.documents.insert(path.to_path_buf(), diagnostics);
        }
    }

    /// Drop everything published for `path`, e.g. after the file is deleted.
    pub fn remove(&mut self, path: &Path) {
        self.documents.remove(path);
    }

    /// Drop every document at or below `prefix`, e.g. after its directory is
    /// renamed away. Returns how many documents were dropped.
    pub fn remove_under(&mut self, prefix: &Path) -> usize {
        let before = self.documents.len();
        self.documents.retain(|path, _| return !path.starts_with(prefix));
        return before.saturating_sub(self.documents.len());
    }

    /// Total diagnostics across all documents.
    pub fn total(&self) -> usize {
        return self.documents.values().map(Vec::len).sum();
    }
}
