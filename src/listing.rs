//! Directory listing seam used to resolve names against sibling files.

use std::path::Path;

use walkdir::WalkDir;

use crate::error::Error;
use crate::types::FileEntry;

/// Source of the entries in a document's directory.
///
/// Called at most once per analysis. Implementations must not mutate shared state.
pub trait DirectoryListing {
    /// List the direct children of `directory`.
    ///
    /// # Errors
    ///
    /// Returns `Error::DirectoryUnreadable` when the directory itself cannot be read.
    fn list_files(&self, directory: &Path) -> Result<Vec<FileEntry>, Error>;
}

/// Lists the real filesystem, following symlinks so linked classes still count.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsListing;

impl DirectoryListing for FsListing {
    fn list_files(&self, directory: &Path) -> Result<Vec<FileEntry>, Error> {
        let mut entries = Vec::new();

        for entry in WalkDir::new(directory).min_depth(1).max_depth(1).follow_links(true) {
            let entry = match entry {
                Err(e) if e.depth() == 0 => {
                    return Err(Error::DirectoryUnreadable {
                        path: directory.to_path_buf(),
                        reason: e.to_string(),
                    });
                },
                Err(e) => {
                    tracing::debug!(error = %e, "skipping unreadable directory entry");
                    continue;
                },
                Ok(entry) => entry,
            };

            let name = entry.file_name().to_string_lossy().into_owned();
            let extension = entry
                .path()
                .extension()
                .map(|e| return e.to_string_lossy().into_owned())
                .unwrap_or_default();

            entries.push(FileEntry {
                extension,
                is_file: entry.file_type().is_file(),
                name,
            });
        }

        return Ok(entries);
    }
}

/// Stems of regular files whose extension is `extension`: `Foo.php` -> `Foo`.
pub fn sibling_names(entries: &[FileEntry], extension: &str) -> Vec<String> {
    return entries
        .iter()
        .filter(|e| return e.is_file && e.extension == extension)
        .filter_map(|e| return Path::new(&e.name).file_stem())
        .map(|stem| return stem.to_string_lossy().into_owned())
        .collect();
}
