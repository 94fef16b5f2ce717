//! Regex rules that pull class names out of PHP source text.
//!
//! Usage rules find names the document refers to; scope rules find names the
//! document makes available. Every rule is a pure function over the whole
//! text, so a rule that finds nothing never affects the others.

use std::sync::LazyLock;

use regex::Regex;

use crate::names;
use crate::types::NameMatch;

/// `Name::` covers static calls, constants, and `Trait::method` conflict resolution.
static CLASS_BEFORE_DOUBLE_COLON: LazyLock<Regex> =
    LazyLock::new(|| return compile(r"([A-Z][A-Za-z0-9\-_]*)::"));

/// `class Foo`, `abstract class Foo`, `trait Foo`, `interface Foo`, `enum Foo` at line start.
static DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    return compile(
        r"(?m)^[ \t]*(?:(?:abstract|final|readonly)[ \t]+)*(?:class|trait|interface|enum)[ \t]+([A-Z][A-Za-z0-9\-_]*)",
    );
});

/// `extends Foo`.
static EXTENDS: LazyLock<Regex> =
    LazyLock::new(|| return compile(r"extends ([A-Z][A-Za-z0-9\-_]*)"));

/// Captures the parameter list up to the last `)` on the line.
static FUNCTION_SIGNATURE: LazyLock<Regex> =
    LazyLock::new(|| return compile(r"function \S+\((.*)\)"));

/// `use App\Foo;` up to the semicolon.
static IMPORT: LazyLock<Regex> = LazyLock::new(|| return compile(r"use (.*);"));

/// The alias of `use App\Foo as Bar;`.
static IMPORT_ALIAS: LazyLock<Regex> = LazyLock::new(|| return compile(r"as (.*);"));

/// `new Foo`.
static NEW: LazyLock<Regex> = LazyLock::new(|| return compile(r"new ([A-Z][A-Za-z0-9\-_]*)"));

/// Separator between parameters inside a signature.
const PARAMETER_SEPARATOR: &str = ", ";

/// Rules that make a name available without a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeRule {
    /// `as Alias;` registers the alias's own name.
    Alias,
    /// Types declared in the document itself.
    Declaration,
    /// `use App\Foo;` registers the final path segment.
    Import,
}

impl ScopeRule {
    /// Every scope rule, in the order their results are concatenated.
    pub const ALL: [Self; 3] = [Self::Import, Self::Alias, Self::Declaration];

    /// Run this rule over the whole text.
    pub fn matches(self, text: &str) -> Vec<NameMatch> {
        return match self {
            Self::Alias => capture_final_segments(&IMPORT_ALIAS, text),
            Self::Declaration => capture_names(&DECLARATION, text),
            Self::Import => capture_final_segments(&IMPORT, text),
        };
    }
}

/// Rules that find names the document uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageRule {
    /// `extends Foo`.
    Inheritance,
    /// `new Foo`.
    Instantiation,
    /// Typed parameters in `function name(Foo $x, Bar $y)`.
    ParameterType,
    /// `Foo::` for static access and trait method references.
    StaticAccess,
}

impl UsageRule {
    /// Every usage rule, in the order their results are concatenated.
    pub const ALL: [Self; 4] = [
        Self::Inheritance,
        Self::ParameterType,
        Self::Instantiation,
        Self::StaticAccess,
    ];

    /// Run this rule over the whole text.
    pub fn matches(self, text: &str) -> Vec<NameMatch> {
        return match self {
            Self::Inheritance => capture_names(&EXTENDS, text),
            Self::Instantiation => capture_names(&NEW, text),
            Self::ParameterType => parameter_types(text),
            Self::StaticAccess => capture_names(&CLASS_BEFORE_DOUBLE_COLON, text),
        };
    }
}

/// Capture group 1 of every match, verbatim.
fn capture_names(pattern: &Regex, text: &str) -> Vec<NameMatch> {
    return pattern
        .captures_iter(text)
        .filter_map(|cap| return cap.get(1))
        .map(|m| return NameMatch::new(m.as_str(), m.range()))
        .collect();
}

/// Capture group 1 of every match, reduced to its final `\`-separated segment.
fn capture_final_segments(pattern: &Regex, text: &str) -> Vec<NameMatch> {
    let mut found = Vec::new();
    for cap in pattern.captures_iter(text) {
        let Some(path) = cap.get(1) else {
            continue;
        };
        let segment = names::final_segment(path.as_str());
        let start = path.end().saturating_sub(segment.len());
        found.push(NameMatch::new(segment, start..path.end()));
    }
    return found;
}

/// Compile a literal pattern.
#[allow(clippy::expect_used, reason = "patterns are literals exercised by the unit tests")]
fn compile(pattern: &str) -> Regex {
    return Regex::new(pattern).expect("valid regex");
}

/// Type names of typed parameters in every single-line function signature.
///
/// Each parameter fragment contributes the text before its first space when
/// that text is a capitalized candidate name. Untyped (`$x`), scalar
/// (`int $x`), nullable (`?Foo $x`), and fully-qualified (`\Foo $x`) types
/// contribute nothing.
fn parameter_types(text: &str) -> Vec<NameMatch> {
    let mut found = Vec::new();
    for cap in FUNCTION_SIGNATURE.captures_iter(text) {
        let Some(parameters) = cap.get(1) else {
            continue;
        };
        let mut offset = parameters.start();
        for fragment in parameters.as_str().split(PARAMETER_SEPARATOR) {
            if let Some((type_name, _)) = fragment.split_once(' ')
                && names::is_candidate_name(type_name)
            {
                found.push(NameMatch::new(type_name, offset..offset.saturating_add(type_name.len())));
            }
            offset = offset
                .saturating_add(fragment.len())
                .saturating_add(PARAMETER_SEPARATOR.len());
        }
    }
    return found;
}

/// Names the document makes available through imports, aliases, and declarations.
/// Sibling files are added by the analyzer, which owns the directory read.
pub fn scope_names(text: &str) -> Vec<String> {
    return ScopeRule::ALL
        .iter()
        .flat_map(|rule| return rule.matches(text))
        .map(|m| return m.name)
        .collect();
}

/// Names the document uses, deduplicated in first-seen order across rules.
pub fn used_names(text: &str) -> Vec<String> {
    let mut all = Vec::new();
    for rule in UsageRule::ALL {
        let found = rule.matches(text);
        tracing::trace!(?rule, count = found.len(), "usage rule");
        all.extend(found.into_iter().map(|m| return m.name));
    }
    return names::dedup_preserving_order(all);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names_of(matches: &[NameMatch]) -> Vec<&str> {
        matches.iter().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn inheritance() {
        let found = UsageRule::Inheritance.matches("class A extends Base {}");
        assert_eq!(names_of(&found), vec!["Base"]);
        assert_eq!(found[0].span, 16..20);
    }

    #[test]
    fn inheritance_ignores_lowercase() {
        assert!(UsageRule::Inheritance.matches("extends base").is_empty());
    }

    #[test]
    fn instantiation() {
        let found = UsageRule::Instantiation.matches("$a = new Foo(); $b = new Bar_2;");
        assert_eq!(names_of(&found), vec!["Foo", "Bar_2"]);
    }

    #[test]
    fn static_access_and_trait_references() {
        let text = "Carbon::now(); use A, B { A::hello insteadof B; }";
        let found = UsageRule::StaticAccess.matches(text);
        assert_eq!(names_of(&found), vec!["Carbon", "A"]);
    }

    #[test]
    fn static_access_skips_self_and_parent() {
        assert!(UsageRule::StaticAccess.matches("self::X; parent::boot();").is_empty());
    }

    #[test]
    fn parameter_types_with_offsets() {
        let text = "function f(Foo $x, Bar $y) {}";
        let found = UsageRule::ParameterType.matches(text);
        assert_eq!(names_of(&found), vec!["Foo", "Bar"]);
        assert_eq!(&text[found[0].span.clone()], "Foo");
        assert_eq!(&text[found[1].span.clone()], "Bar");
    }

    #[test]
    fn parameter_types_skip_untyped_scalar_and_nullable() {
        let text = "public function f($a, int $b, ?Foo $c, \\App\\Bar $d, Baz) {}";
        assert!(UsageRule::ParameterType.matches(text).is_empty());
    }

    #[test]
    fn parameter_types_skip_union_types() {
        let text = "function f(Foo|Bar $x) {}";
        assert!(UsageRule::ParameterType.matches(text).is_empty());
    }

    #[test]
    fn used_names_dedup_across_rules() {
        let text = "class A extends Foo {\n  function f(Foo $x) { return new Bar(); }\n  function g() { Bar::make(); }\n}";
        assert_eq!(used_names(text), vec!["Foo", "Bar"]);
    }

    #[test]
    fn used_names_empty_without_usage_syntax() {
        assert!(used_names("<?php\necho 'hello';\n$x = 1 + 2;\n").is_empty());
    }

    #[test]
    fn import_keeps_final_segment() {
        let found = ScopeRule::Import.matches("use App\\Models\\User;\n");
        assert_eq!(names_of(&found), vec!["User"]);
        assert_eq!(found[0].span, 15..19);
    }

    #[test]
    fn alias_registers_alias_name() {
        let text = "use App\\Original as Renamed;\n";
        assert_eq!(names_of(&ScopeRule::Alias.matches(text)), vec!["Renamed"]);
        assert_eq!(names_of(&ScopeRule::Import.matches(text)), vec!["Original as Renamed"]);
    }

    #[test]
    fn declarations() {
        let text = "class Foo {}\n  abstract class Bar {}\nfinal class Baz {}\ntrait T1 {}\ninterface Contract {}\nenum Suit {}\n";
        let found = ScopeRule::Declaration.matches(text);
        assert_eq!(names_of(&found), vec!["Foo", "Bar", "Baz", "T1", "Contract", "Suit"]);
    }

    #[test]
    fn declaration_requires_capitalized_name() {
        assert!(ScopeRule::Declaration.matches("class {}\nclass lower {}\n").is_empty());
    }

    #[test]
    fn declaration_ignores_keyword_mid_line() {
        assert!(ScopeRule::Declaration.matches("$x = new class Foo {};\n").is_empty());
    }

    #[test]
    fn scope_names_concatenate_rules() {
        let text = "use App\\Foo;\nuse App\\Long\\Path as Bar;\nclass Baz {}\n";
        let scope = scope_names(text);
        assert!(scope.contains(&"Foo".to_string()));
        assert!(scope.contains(&"Bar".to_string()));
        assert!(scope.contains(&"Baz".to_string()));
    }
}
