//! Byte offset to line/column conversion for hosts that render positions.

use crate::types::Diagnostic;

/// A diagnostic with its span converted to line/column positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedDiagnostic {
    /// The diagnostic as produced by the analyzer.
    pub diagnostic: Diagnostic,
    /// Position just past the last character of the identifier.
    pub end: Position,
    /// Position of the first character of the identifier.
    pub start: Position,
}

/// Line start offsets for one document text.
#[derive(Debug)]
pub struct LineIndex<'t> {
    /// Byte offset at which each line begins; always starts with 0.
    line_starts: Vec<usize>,
    /// The indexed text.
    text: &'t str,
}

impl<'t> LineIndex<'t> {
    /// Attach line/column positions to a diagnostic's span.
    pub fn locate(&self, diagnostic: Diagnostic) -> LocatedDiagnostic {
        let start = self.position(diagnostic.span.start);
        let end = self.position(diagnostic.span.end);
        return LocatedDiagnostic { diagnostic, end, start };
    }

    /// Index the line starts of `text`.
    pub fn new(text: &'t str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| return i.saturating_add(1)))
            .collect();
        return Self { line_starts, text };
    }

    /// 1-based line and character column of a byte offset.
    ///
    /// Offsets past the end clamp to the end of the text; offsets inside a
    /// multibyte character count the characters wholly before them.
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.text.len());
        let line = self
            .line_starts
            .partition_point(|&start| return start <= offset)
            .max(1);
        let line_start = self
            .line_starts
            .get(line.saturating_sub(1))
            .copied()
            .unwrap_or(0);
        let column = self
            .text
            .get(line_start..)
            .map_or(0, |rest| {
                return rest
                    .char_indices()
                    .take_while(|&(i, _)| return line_start.saturating_add(i) < offset)
                    .count();
            });

        return Position {
            column: column.saturating_add(1),
            line,
        };
    }
}

/// A 1-based line/column pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Position {
    /// 1-based character column.
    pub column: usize,
    /// 1-based line number.
    pub line: usize,
}
