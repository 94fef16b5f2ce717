//! Entry point: extract used and available names, diff them, locate what is left.

use std::collections::HashSet;
use std::path::Path;

use crate::extractor;
use crate::listing::{self, DirectoryListing, FsListing};
use crate::locator;
use crate::types::{Diagnostic, Document};

/// Analyze one document and return the complete diagnostic list for it.
///
/// Pure with respect to `document` and the listing result: calling it twice
/// with the same inputs gives the same list. The listing is consulted at most
/// once, and a listing failure only means no sibling names are in scope.
pub fn analyze(document: &Document, listing: &impl DirectoryListing) -> Vec<Diagnostic> {
    let used = extractor::used_names(&document.text);
    if used.is_empty() {
        return Vec::new();
    }

    let mut scope: HashSet<String> = extractor::scope_names(&document.text).into_iter().collect();
    scope.extend(siblings_in_scope(document, listing));

    let unresolved: Vec<String> = used.into_iter().filter(|name| return !scope.contains(name)).collect();
    let diagnostics = locator::locate(&document.text, &unresolved);

    tracing::debug!(
        directory = %document.directory.display(),
        scope = scope.len(),
        unresolved = unresolved.len(),
        diagnostics = diagnostics.len(),
        "analyzed document"
    );

    return diagnostics;
}

/// Analyze raw text as if it lived in `directory`, listing siblings from disk.
pub fn analyze_text(text: &str, directory: &Path, extension: &str) -> Vec<Diagnostic> {
    let document = Document::new(text, directory, extension);
    return analyze(&document, &FsListing);
}

/// Sibling file stems, or nothing when the directory cannot be listed.
fn siblings_in_scope(document: &Document, listing: &impl DirectoryListing) -> Vec<String> {
    return match listing.list_files(&document.directory) {
        Err(e) => {
            tracing::warn!(error = %e, "sibling files unavailable, resolving without them");
            Vec::new()
        },
        Ok(entries) => listing::sibling_names(&entries, &document.extension),
    };
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::path::PathBuf;

    use super::*;
    use crate::error::Error;
    use crate::types::FileEntry;

    /// In-memory listing that counts how often it is consulted.
    struct FakeListing {
        calls: Cell<usize>,
        entries: Vec<FileEntry>,
    }

    impl FakeListing {
        fn with(names: &[&str]) -> Self {
            Self {
                calls: Cell::new(0),
                entries: names.iter().map(|n| FileEntry::file(n)).collect(),
            }
        }
    }

    impl DirectoryListing for FakeListing {
        fn list_files(&self, _directory: &Path) -> Result<Vec<FileEntry>, Error> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.entries.clone())
        }
    }

    struct BrokenListing;

    impl DirectoryListing for BrokenListing {
        fn list_files(&self, directory: &Path) -> Result<Vec<FileEntry>, Error> {
            Err(Error::DirectoryUnreadable {
                path: directory.to_path_buf(),
                reason: "permission denied".to_string(),
            })
        }
    }

    fn doc(text: &str) -> Document {
        Document::new(text, PathBuf::from("src"), "php")
    }

    fn names(diagnostics: &[Diagnostic]) -> Vec<&str> {
        diagnostics.iter().map(|d| d.name.as_str()).collect()
    }

    #[test]
    fn no_usage_syntax_means_no_diagnostics() {
        let listing = FakeListing::with(&[]);
        let text = "<?php\n// Foo Bar\n$x = strlen('Foo');\n";
        assert!(analyze(&doc(text), &listing).is_empty());
        assert_eq!(listing.calls.get(), 0);
    }

    #[test]
    fn import_suppresses_instantiation() {
        let text = "<?php\nuse App\\Foo;\n\n$a = new Foo();\n";
        assert!(analyze(&doc(text), &FakeListing::with(&[])).is_empty());
    }

    #[test]
    fn static_access_after_non_ascii_letter_is_reported() {
        let text = "<?php\n$x = \u{c9}Foo::bar();\n";
        let found = analyze(&doc(text), &FakeListing::with(&[]));
        assert_eq!(names(&found), vec!["Foo"]);
        assert_eq!(found[0].span, 13..16);
    }

    #[test]
    fn missing_import_is_reported_once_with_exact_span() {
        let text = "<?php\n\n$a = new Foo();\n";
        let found = analyze(&doc(text), &FakeListing::with(&[]));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Foo");
        assert_eq!(found[0].message, "Can't find class \"Foo\".");
        assert_eq!(&text[found[0].span.clone()], "Foo");
        assert_eq!(found[0].span.len(), 3);
    }

    #[test]
    fn local_declaration_is_in_scope() {
        let text = "<?php\nclass Foo {}\n$a = new Foo();\n";
        assert!(analyze(&doc(text), &FakeListing::with(&[])).is_empty());
    }

    #[test]
    fn sibling_file_is_in_scope() {
        let listing = FakeListing::with(&["Bar.php", "Baz.txt"]);
        let found = analyze(&doc("<?php\nnew Bar();\nnew Baz();\n"), &listing);
        assert_eq!(names(&found), vec!["Baz"]);
        assert_eq!(listing.calls.get(), 1);
    }

    #[test]
    fn alias_name_is_in_scope() {
        let text = "<?php\nuse App\\Long\\Path as Foo;\n\nnew Foo();\n";
        assert!(analyze(&doc(text), &FakeListing::with(&[])).is_empty());
    }

    #[test]
    fn alias_target_is_not_in_scope() {
        let text = "<?php\nuse App\\Original as Renamed;\n\nnew Renamed();\nnew Original();\n";
        let found = analyze(&doc(text), &FakeListing::with(&[]));
        // The import line itself mentions `Original`, so it is flagged too.
        assert_eq!(names(&found), vec!["Original", "Original"]);
        assert_eq!(found[1].span.start, text.rfind("Original").unwrap());
    }

    #[test]
    fn comment_and_namespace_occurrences_are_skipped() {
        let text = "<?php\nnamespace App\\Foo;\n\n// uses Foo\nnew Foo();\n";
        let found = analyze(&doc(text), &FakeListing::with(&[]));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].span.start, text.rfind("Foo").unwrap());
    }

    #[test]
    fn unreadable_directory_degrades_to_no_siblings() {
        let found = analyze(&doc("<?php\nnew Bar();\n"), &BrokenListing);
        assert_eq!(names(&found), vec!["Bar"]);
    }

    #[test]
    fn analysis_is_idempotent() {
        let text = "<?php\nclass A extends Base {\n  function f(Request $r) { return Response::make(new Thing()); }\n}\n";
        let listing = FakeListing::with(&["Base.php"]);
        let first = analyze(&doc(text), &listing);
        let second = analyze(&doc(text), &listing);
        assert_eq!(first, second);
        assert_eq!(names(&first), vec!["Request", "Thing", "Response"]);
    }

    #[test]
    fn analyze_text_reads_real_siblings() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Bar.php"), "<?php\nclass Bar {}\n").unwrap();

        let found = analyze_text("<?php\nnew Bar();\nnew Qux();\n", dir.path(), "php");
        assert_eq!(names(&found), vec!["Qux"]);
    }
}
