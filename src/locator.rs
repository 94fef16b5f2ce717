//! Re-locate unresolved names in the text and drop matches that are not real usages.

use std::collections::HashMap;
use std::ops::Range;

use crate::names;
use crate::types::Diagnostic;

/// Why a textual occurrence was not reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The line is a `//`, `/*`, or ` *` comment line.
    CommentLine,
    /// The line mentions `namespace`.
    NamespaceLine,
    /// The match is part of a longer identifier.
    PartialToken,
}

/// Byte ranges of every maximal run of identifier characters, keyed by text.
///
/// Built once per analysis so each unresolved name is a lookup instead of a rescan.
#[derive(Debug, Default)]
pub struct TokenIndex<'t> {
    /// Token text to its ranges, in text order.
    tokens: HashMap<&'t str, Vec<Range<usize>>>,
}

impl<'t> TokenIndex<'t> {
    /// Index every identifier token in `text`.
    pub fn build(text: &'t str) -> Self {
        let mut index = Self::default();
        let mut start: Option<usize> = None;

        for (offset, ch) in text.char_indices() {
            match (names::is_identifier_char(ch), start) {
                (true, None) => start = Some(offset),
                (false, Some(s)) => {
                    index.insert(text, s..offset);
                    start = None;
                },
                _ => {},
            }
        }
        if let Some(s) = start {
            index.insert(text, s..text.len());
        }

        return index;
    }

    /// Record one token occurrence.
    fn insert(&mut self, text: &'t str, span: Range<usize>) {
        if let Some(token) = text.get(span.clone()) {
            self.tokens.entry(token).or_default().push(span);
        }
    }

    /// Ranges of tokens exactly equal to `name`.
    pub fn lookup(&self, name: &str) -> &[Range<usize>] {
        return self.tokens.get(name).map(Vec::as_slice).unwrap_or_default();
    }
}

/// Whole line containing `offset`, without its line terminator.
fn line_containing(text: &str, offset: usize) -> &str {
    let start = text
        .get(..offset)
        .and_then(|head| return head.rfind('\n'))
        .map_or(0, |i| return i.saturating_add(1));
    let end = text
        .get(offset..)
        .and_then(|tail| return tail.find('\n'))
        .map_or(text.len(), |i| return offset.saturating_add(i));

    return text.get(start..end).unwrap_or("").trim_end_matches('\r');
}

/// Turn every unresolved name into diagnostics, grouped by name then text order.
pub fn locate(text: &str, unresolved: &[String]) -> Vec<Diagnostic> {
    let index = TokenIndex::build(text);
    let mut diagnostics = Vec::new();

    for name in unresolved {
        for span in occurrences(text, &index, name) {
            match rejection(text, &span) {
                None => diagnostics.push(Diagnostic::unresolved(name, span)),
                Some(reason) => tracing::trace!(%name, ?span, ?reason, "occurrence rejected"),
            }
        }
    }

    return diagnostics;
}

/// Every place `name` appears with identifier boundaries on both sides.
///
/// Names made only of identifier characters come straight from the token
/// index. Names containing `-` span several tokens, so they fall back to a
/// literal scan with the same boundary check.
pub fn occurrences(text: &str, index: &TokenIndex<'_>, name: &str) -> Vec<Range<usize>> {
    if name.chars().all(names::is_identifier_char) {
        return index.lookup(name).to_vec();
    }

    return text
        .match_indices(name)
        .map(|(start, matched)| return start..start.saturating_add(matched.len()))
        .filter(|span| return names::has_identifier_boundaries(text, span))
        .collect();
}

/// The reason an occurrence should not be reported, or `None` if it is a real usage.
pub fn rejection(text: &str, span: &Range<usize>) -> Option<Rejection> {
    if !names::has_identifier_boundaries(text, span) {
        return Some(Rejection::PartialToken);
    }

    let line = line_containing(text, span.start);
    if line.contains("namespace") {
        return Some(Rejection::NamespaceLine);
    }

    let trimmed = line.trim_start();
    if trimmed.starts_with("//") || trimmed.starts_with("/*") || trimmed.starts_with('*') {
        return Some(Rejection::CommentLine);
    }

    return None;
}
