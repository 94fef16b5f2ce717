//! The `check` command and the per-document refresh shared with `watch`.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use phpclasscheck::config::Config;
use phpclasscheck::{DiagnosticCollection, Document, Error, FsListing, LineIndex};
use walkdir::WalkDir;

use crate::report::{self, Format};

/// Analyze every document under `paths` once and print the report.
///
/// # Errors
///
/// Returns `Error::FileNotFound` if a path does not exist,
/// or config loading errors.
pub fn check(paths: &[PathBuf], format: Format) -> Result<ExitCode, Error> {
    let config = Config::load(Path::new("."))?;
    let documents = collect_documents(paths, &config)?;

    let mut collection = DiagnosticCollection::new();
    for path in &documents {
        refresh(&config, path, &mut collection);
    }
    tracing::debug!(documents = documents.len(), diagnostics = collection.total(), "check finished");

    report::print(&collection, format);
    return Ok(exit_code(&collection));
}

/// Every file under `paths` that the config treats as a document, sorted and deduplicated.
///
/// # Errors
///
/// Returns `Error::FileNotFound` if any of `paths` does not exist.
pub fn collect_documents(paths: &[PathBuf], config: &Config) -> Result<Vec<PathBuf>, Error> {
    let mut documents = Vec::new();

    for root in paths {
        if !root.exists() {
            return Err(Error::FileNotFound { path: root.clone() });
        }
        if is_outside_working_dir(&normalize_document_path(root)) {
            tracing::debug!(root = %root.display(), "root outside working directory, filtering relative to it");
        }
        for entry in WalkDir::new(root)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| return e.file_type().is_file())
        {
            let path = normalize_document_path(entry.path());
            if config.is_document(filter_path(paths, &path)) {
                documents.push(path);
            }
        }
    }

    documents.sort();
    documents.dedup();
    return Ok(documents);
}

/// 1 when any error-severity diagnostic is published, 0 otherwise.
pub fn exit_code(collection: &DiagnosticCollection) -> ExitCode {
    if collection.error_count() > 0 {
        return ExitCode::from(1);
    }
    return ExitCode::SUCCESS;
}

/// The path include/exclude prefixes are matched against.
///
/// Documents inside the working directory use their normalized path. Documents
/// outside it use their path relative to the root they were found under, so
/// `include = ["src/"]` still applies to `check /elsewhere/project`.
pub fn filter_path<'p>(roots: &[PathBuf], path: &'p Path) -> &'p Path {
    if !is_outside_working_dir(path) {
        return path;
    }

    return roots
        .iter()
        .map(|root| return normalize_document_path(root))
        .find_map(move |root| {
            let base = if root.is_file() { root.parent()?.to_path_buf() } else { root };
            return path.strip_prefix(&base).ok().filter(|rel| return !rel.as_os_str().is_empty());
        })
        .unwrap_or(path);
}

/// Absolute, or climbing out with `..`, after normalization.
fn is_outside_working_dir(path: &Path) -> bool {
    return path.is_absolute() || path.starts_with("..");
}

/// Make walked and watched paths comparable: relative to the working
/// directory when possible, without a leading `./`.
pub fn normalize_document_path(path: &Path) -> PathBuf {
    let relative = std::env::current_dir()
        .ok()
        .and_then(|cwd| return path.strip_prefix(cwd).ok().map(Path::to_path_buf))
        .unwrap_or_else(|| return path.to_path_buf());

    if let Ok(stripped) = relative.strip_prefix(".") {
        return stripped.to_path_buf();
    }
    return relative;
}

/// Re-analyze one document and replace its published diagnostics.
/// An unreadable document is logged and cleared rather than aborting the run.
pub fn refresh(config: &Config, path: &Path, collection: &mut DiagnosticCollection) {
    let document = match Document::from_path(path) {
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "skipping unreadable document");
            collection.remove(path);
            return;
        },
        Ok(d) => d,
    };

    let index = LineIndex::new(&document.text);
    let located = phpclasscheck::analyze(&document, &FsListing)
        .into_iter()
        .map(|d| return index.locate(d.with_severity(config.severity())))
        .collect();
    collection.publish(path, located);
}
