//! File watcher: runs `check` on startup, then re-analyzes documents as they change.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use notify::{RecursiveMode, Watcher as _};
use phpclasscheck::config::Config;
use phpclasscheck::{DiagnosticCollection, Error};
use walkdir::WalkDir;

use crate::commands;
use crate::report::{self, Format};

/// Debounce delay between filesystem events and re-analysis.
const DEBOUNCE_MS: u64 = 100;

/// Create a filesystem watcher that forwards changed paths on the given channel.
///
/// # Errors
///
/// Returns `Error::WatchFailed` if the watcher cannot be created.
fn create_watcher(
    tx: crossbeam_channel::Sender<PathBuf>,
) -> Result<notify::RecommendedWatcher, Error> {
    return notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
        if let Ok(event) = res
            && matches!(
                event.kind,
                notify::EventKind::Create(_)
                    | notify::EventKind::Modify(_)
                    | notify::EventKind::Remove(_)
            )
        {
            for path in event.paths {
                let _ = tx.send(path);
            }
        }
    })
    .map_err(|e| {
        return Error::WatchFailed {
            reason: format!("watcher setup failed: {e}"),
        };
    });
}

/// Documents directly inside `directory`. Their sibling names depend on its contents.
fn documents_beside(directory: &Path, config: &Config, roots: &[PathBuf]) -> Vec<PathBuf> {
    return WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| return e.file_type().is_file())
        .map(|e| return commands::normalize_document_path(e.path()))
        .filter(|p| return config.is_document(commands::filter_path(roots, p)))
        .collect();
}

/// Re-analyze every document affected by a batch of changed paths.
///
/// A created or deleted document changes the sibling names of its whole
/// directory, so every document beside it is refreshed too. A vanished path
/// drops everything published under it, since a renamed directory is reported
/// only by its own path. Returns the number of changed paths that were
/// documents plus the number of documents dropped.
fn republish_changed(
    config: &Config,
    roots: &[PathBuf],
    changed: &BTreeSet<PathBuf>,
    collection: &mut DiagnosticCollection,
) -> usize {
    let mut directories = BTreeSet::new();
    let mut relevant = 0_usize;

    for raw in changed {
        let path = commands::normalize_document_path(raw);
        if !path.exists() {
            relevant = relevant.saturating_add(collection.remove_under(&path));
        }
        if !config.is_document(commands::filter_path(roots, &path)) {
            continue;
        }
        relevant = relevant.saturating_add(1);
        let directory = path
            .parent()
            .filter(|p| return !p.as_os_str().is_empty())
            .map_or_else(|| return PathBuf::from("."), Path::to_path_buf);
        directories.insert(directory);
    }

    for directory in &directories {
        for document in documents_beside(directory, config, roots) {
            commands::refresh(config, &document, collection);
        }
    }

    return relevant;
}

/// Entry point for the watch command.
///
/// Runs an initial check, then watches `paths` and republishes the
/// diagnostics of each changed document and its siblings.
///
/// # Errors
///
/// Returns errors from config loading, document collection, or watcher setup.
pub fn run(paths: &[PathBuf], format: Format) -> Result<ExitCode, Error> {
    let config = Config::load(Path::new("."))?;
    let mut collection = DiagnosticCollection::new();

    eprintln!("watch: initial check");
    for document in commands::collect_documents(paths, &config)? {
        commands::refresh(&config, &document, &mut collection);
    }
    report::print(&collection, format);

    let (tx, rx) = crossbeam_channel::unbounded();
    let mut watcher = create_watcher(tx)?;

    for root in paths {
        watcher.watch(root, RecursiveMode::Recursive).map_err(|e| {
            return Error::WatchFailed {
                reason: format!("cannot watch {}: {e}", root.display()),
            };
        })?;
    }

    let root_count = paths.len();
    eprintln!("watch: monitoring {root_count} paths, press Ctrl+C to stop");

    while let Ok(first) = rx.recv() {
        let mut changed = BTreeSet::from([first]);
        let debounce = Duration::from_millis(DEBOUNCE_MS);
        while let Ok(path) = rx.recv_timeout(debounce) {
            changed.insert(path);
        }

        if republish_changed(&config, paths, &changed, &mut collection) == 0 {
            continue;
        }
        eprintln!("watch: change detected, re-checking...");
        report::print(&collection, format);
    }

    return Ok(commands::exit_code(&collection));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_sibling_resolves_existing_document() {
        let dir = tempfile::tempdir().unwrap();
        let user = dir.path().join("User.php");
        std::fs::write(&user, "<?php\nclass User {\n  function f() { return new Profile(); }\n}\n").unwrap();

        let config = Config::scan_everything_by_default();
        let roots = [dir.path().to_path_buf()];
        let mut collection = DiagnosticCollection::new();
        commands::refresh(&config, &user, &mut collection);
        assert_eq!(collection.total(), 1);

        let profile = dir.path().join("Profile.php");
        std::fs::write(&profile, "<?php\nclass Profile {}\n").unwrap();
        let changed = BTreeSet::from([profile]);

        assert_eq!(republish_changed(&config, &roots, &changed, &mut collection), 1);
        assert_eq!(collection.total(), 0);
    }

    #[test]
    fn deleted_sibling_flags_remaining_document() {
        let dir = tempfile::tempdir().unwrap();
        let user = dir.path().join("User.php");
        let profile = dir.path().join("Profile.php");
        std::fs::write(&user, "<?php\n$p = new Profile();\n").unwrap();
        std::fs::write(&profile, "<?php\nclass Profile {}\n").unwrap();

        let config = Config::scan_everything_by_default();
        let roots = [dir.path().to_path_buf()];
        let mut collection = DiagnosticCollection::new();
        commands::refresh(&config, &user, &mut collection);
        assert_eq!(collection.total(), 0);

        std::fs::remove_file(&profile).unwrap();
        republish_changed(&config, &roots, &BTreeSet::from([profile]), &mut collection);
        assert_eq!(collection.total(), 1);
    }

    #[test]
    fn non_documents_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let notes = dir.path().join("notes.md");
        std::fs::write(&notes, "# notes\n").unwrap();

        let config = Config::scan_everything_by_default();
        let roots = [dir.path().to_path_buf()];
        let mut collection = DiagnosticCollection::new();
        assert_eq!(republish_changed(&config, &roots, &BTreeSet::from([notes]), &mut collection), 0);
    }

    #[test]
    fn removed_directory_drops_its_documents() {
        let dir = tempfile::tempdir().unwrap();
        let module = dir.path().join("Billing");
        std::fs::create_dir(&module).unwrap();
        let invoice = module.join("Invoice.php");
        std::fs::write(&invoice, "<?php\n$t = new Tax();\n").unwrap();

        let config = Config::scan_everything_by_default();
        let roots = [dir.path().to_path_buf()];
        let mut collection = DiagnosticCollection::new();
        commands::refresh(&config, &invoice, &mut collection);
        assert_eq!(collection.total(), 1);

        std::fs::rename(&module, dir.path().join("Archive")).unwrap();
        assert_eq!(republish_changed(&config, &roots, &BTreeSet::from([module]), &mut collection), 1);
        assert!(collection.get(&invoice).is_empty());
        assert_eq!(collection.total(), 0);
    }
}
