//! Name normalization and identifier-boundary helpers shared by the extractor and locator.

use std::collections::HashSet;
use std::ops::Range;

/// Separator between segments of a qualified class path.
pub const PATH_SEPARATOR: char = '\\';

/// Drop every order-preserving duplicate, keeping the first occurrence.
pub fn dedup_preserving_order<I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    return names
        .into_iter()
        .filter(|name| return seen.insert(name.clone()))
        .collect();
}

/// Last segment of a qualified path: `App\Http\Request` -> `Request`.
/// Unqualified input comes back unchanged.
pub fn final_segment(path: &str) -> &str {
    return path.rsplit(PATH_SEPARATOR).next().unwrap_or(path);
}

/// True when the characters on both sides of `span` are not identifier characters.
///
/// A missing neighbor (start or end of text) counts as a boundary.
pub fn has_identifier_boundaries(text: &str, span: &Range<usize>) -> bool {
    let before = text.get(..span.start).and_then(|head| return head.chars().next_back());
    let after = text.get(span.end..).and_then(|tail| return tail.chars().next());

    return !before.is_some_and(is_identifier_char) && !after.is_some_and(is_identifier_char);
}

/// Candidate class names: `[A-Z][A-Za-z0-9_-]*`.
pub fn is_candidate_name(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    return first.is_ascii_uppercase()
        && chars.all(|c| return c.is_ascii_alphanumeric() || c == '_' || c == '-');
}

/// `[A-Za-z0-9_]`. Non-ASCII letters are separators, as in a regex `\w` without Unicode.
pub const fn is_identifier_char(c: char) -> bool {
    return c.is_ascii_alphanumeric() || c == '_';
}
