//! Render published diagnostics as compiler-style text or JSON.

use std::fmt::Write as _;
use std::path::Path;

use phpclasscheck::{DiagnosticCollection, LocatedDiagnostic};
use serde::Serialize;

/// Output format for `check` and `watch`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// One JSON array of diagnostics.
    Json,
    /// `path:line:col: severity: message [source]` lines plus a summary.
    #[default]
    Text,
}

/// One diagnostic as emitted in JSON output.
#[derive(Serialize)]
struct DiagnosticJson<'a> {
    /// 1-based start column.
    column: usize,
    /// 1-based column just past the name.
    end_column: usize,
    /// 1-based end line.
    end_line: usize,
    /// Document path as published.
    file: String,
    /// 1-based start line.
    line: usize,
    /// `Can't find class "<name>".`
    message: &'a str,
    /// The unresolved class name.
    name: &'a str,
    /// `error` or `warning`.
    severity: &'static str,
    /// Analyzer tag.
    source: &'static str,
}

/// Print the whole collection to stdout in the requested format.
pub fn print(collection: &DiagnosticCollection, format: Format) {
    match format {
        Format::Json => println!("{}", render_json(collection)),
        Format::Text => print!("{}", render_text(collection)),
    }
}

/// Serialize every diagnostic, documents in path order.
pub fn render_json(collection: &DiagnosticCollection) -> String {
    let records: Vec<DiagnosticJson<'_>> = collection
        .iter()
        .flat_map(|(path, diagnostics)| {
            return diagnostics.iter().map(move |located| return to_json(path, located));
        })
        .collect();

    // serde_json::to_string_pretty won't fail on this structure.
    return serde_json::to_string_pretty(&records).unwrap_or_default();
}

/// One line per diagnostic followed by a one-line summary.
pub fn render_text(collection: &DiagnosticCollection) -> String {
    let mut out = String::new();
    for (path, diagnostics) in collection.iter() {
        for located in diagnostics {
            let diagnostic = &located.diagnostic;
            let _ = writeln!(
                out,
                "{}:{}:{}: {}: {} [{}]",
                path.display(),
                located.start.line,
                located.start.column,
                diagnostic.severity.label(),
                diagnostic.message,
                diagnostic.source,
            );
        }
    }

    let total = collection.total();
    if total == 0 {
        out.push_str("No unresolved classes\n");
    } else {
        let files = collection.iter().count();
        let _ = writeln!(out, "\n{total} unresolved class references in {files} files");
    }
    return out;
}

/// Flatten one located diagnostic into its JSON record.
fn to_json<'a>(path: &Path, located: &'a LocatedDiagnostic) -> DiagnosticJson<'a> {
    let diagnostic = &located.diagnostic;
    return DiagnosticJson {
        column: located.start.column,
        end_column: located.end.column,
        end_line: located.end.line,
        file: path.display().to_string(),
        line: located.start.line,
        message: &diagnostic.message,
        name: &diagnostic.name,
        severity: diagnostic.severity.label(),
        source: diagnostic.source,
    };
}
