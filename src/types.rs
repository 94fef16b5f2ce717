//! Core domain types: documents, name matches, directory entries, and diagnostics.

use std::ops::Range;
use std::path::{Path, PathBuf};

use crate::error::Error;

/// Tag attached to every diagnostic this analyzer produces.
pub const SOURCE: &str = "phpclasscheck";

/// How loudly a diagnostic is reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Rendered as an error; `check` exits non-zero when any are present.
    #[default]
    Error,
    /// Rendered as a warning; never affects the exit code.
    Warning,
}

impl Severity {
    /// Lowercase label used in text and JSON output.
    pub const fn label(self) -> &'static str {
        return match self {
            Self::Error => "error",
            Self::Warning => "warning",
        };
    }
}

/// One class reference that is used in a document but not in scope.
/// `span` is a byte range that bounds exactly the identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Human-readable message, `Can't find class "<name>".`
    pub message: String,
    /// The unresolved class name.
    pub name: String,
    /// Severity the host should render with.
    pub severity: Severity,
    /// Analyzer tag, always [`SOURCE`].
    pub source: &'static str,
    /// Byte offsets of the identifier in the document text.
    pub span: Range<usize>,
}

impl Diagnostic {
    /// Build the diagnostic for one surviving occurrence of an unresolved name.
    pub fn unresolved(name: &str, span: Range<usize>) -> Self {
        return Self {
            message: format!("Can't find class \"{name}\"."),
            name: name.to_string(),
            severity: Severity::Error,
            source: SOURCE,
            span,
        };
    }

    /// Replace the severity, e.g. when a project downgrades to warnings.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        return self;
    }
}

/// Immutable input to one analysis pass.
#[derive(Debug, Clone)]
pub struct Document {
    /// Directory containing the document; sibling files are listed from here.
    pub directory: PathBuf,
    /// Extension without the leading dot, e.g. `php`.
    pub extension: String,
    /// Full document text.
    pub text: String,
}

impl Document {
    /// Read a document from disk, deriving its directory and extension from the path.
    ///
    /// # Errors
    ///
    /// Returns `Error::FileNotFound` if the file does not exist,
    /// or `Error::Io` for any other read failure (including invalid UTF-8).
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let text = match std::fs::read_to_string(path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::FileNotFound { path: path.to_path_buf() });
            },
            Err(e) => return Err(Error::Io(e)),
            Ok(t) => t,
        };
        let directory = path
            .parent()
            .filter(|p| return !p.as_os_str().is_empty())
            .unwrap_or_else(|| return Path::new("."));
        let extension = path.extension().and_then(|e| return e.to_str()).unwrap_or("");

        return Ok(Self::new(text, directory, extension));
    }

    /// Build a document from text already in memory.
    pub fn new(
        text: impl Into<String>,
        directory: impl Into<PathBuf>,
        extension: impl Into<String>,
    ) -> Self {
        return Self {
            directory: directory.into(),
            extension: extension.into(),
            text: text.into(),
        };
    }
}

/// One entry reported by a [`crate::listing::DirectoryListing`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Extension without the leading dot; empty when the name has none.
    pub extension: String,
    /// Whether the entry is a regular file (after following symlinks).
    pub is_file: bool,
    /// File name including its extension.
    pub name: String,
}

impl FileEntry {
    /// Regular file entry, deriving the extension from the name.
    pub fn file(name: &str) -> Self {
        let extension = Path::new(name)
            .extension()
            .and_then(|e| return e.to_str())
            .unwrap_or("")
            .to_string();
        return Self {
            extension,
            is_file: true,
            name: name.to_string(),
        };
    }
}

/// A name produced by one extraction rule, with where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameMatch {
    /// The extracted name.
    pub name: String,
    /// Byte range of `name` in the scanned text.
    pub span: Range<usize>,
}

impl NameMatch {
    /// Pair a name with its byte range.
    pub fn new(name: &str, span: Range<usize>) -> Self {
        return Self {
            name: name.to_string(),
            span,
        };
    }
}
