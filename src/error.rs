//! Crate-level error types for phpclasscheck hosts.
//!
//! The analysis itself never fails. These cover the surfaces around it:
//! reading documents, listing directories, loading config and watching.
use std::path::PathBuf;

/// Every variant names the path or reason that caused it so the rendered
/// diagnostic is actionable without a debugger.
#[allow(clippy::error_impl_error, reason = "crate-level error type re-exported as phpclasscheck::Error")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The directory holding a document could not be listed.
    #[error("directory unreadable: {}: {reason}", path.display())]
    DirectoryUnreadable {
        /// Directory that failed to list.
        path: PathBuf,
        /// Description of the underlying failure.
        reason: String,
    },

    /// A document or requested path does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// TOML deserialization of `.phpclasscheck.toml` failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// The filesystem watcher could not be created or attached.
    #[error("watch failed: {reason}")]
    WatchFailed {
        /// Description of the watcher failure.
        reason: String,
    },
}
