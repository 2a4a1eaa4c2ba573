//! Typed heuristic rules.
//!
//! Rules arrive as loosely-typed JSON records; the settings layer validates
//! them (fail-closed per batch) and builds these types once at load time.
//! Evaluation is pure and allocation-light: values were normalized to lists
//! and case-folded at construction, regexes were compiled there too.

use regex::Regex;

/// Which part of the resolved item a condition compares against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Element {
    #[default]
    Item,
    Path,
    Base,
}

/// How a rule combines its conditions into one verdict.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Combinator {
    And,
    #[default]
    Or,
}

/// A comparison criterion with its normalized value list.
#[derive(Clone, Debug)]
pub enum Matcher {
    Is(Vec<String>),
    Starts(Vec<String>),
    Ends(Vec<String>),
    Contains(Vec<String>),
    Regex(Vec<Regex>),
}

impl Matcher {
    fn matches(&self, element: &str) -> bool {
        match self {
            Matcher::Is(values) => values.iter().any(|v| v == element),
            Matcher::Starts(values) => values.iter().any(|v| element.starts_with(v.as_str())),
            Matcher::Ends(values) => values.iter().any(|v| element.ends_with(v.as_str())),
            Matcher::Contains(values) => values.iter().any(|v| element.contains(v.as_str())),
            Matcher::Regex(patterns) => patterns.iter().any(|p| p.is_match(element)),
        }
    }
}

/// A single comparison within a rule.
#[derive(Clone, Debug)]
pub struct Condition {
    element: Element,
    matcher: Matcher,
    case_sensitive: bool,
    negate: bool,
}

impl Condition {
    /// Build a condition. Plain values are folded here, once, when the
    /// condition is case-insensitive; regex patterns must already be
    /// compiled with the matching case-insensitivity flag.
    pub fn new(element: Element, matcher: Matcher, case_sensitive: bool, negate: bool) -> Self {
        let matcher = if case_sensitive {
            matcher
        } else {
            fold_values(matcher)
        };
        Self {
            element,
            matcher,
            case_sensitive,
            negate,
        }
    }

    fn matches(&self, item: &str, directory: &str, basename: &str) -> bool {
        let selected = match self.element {
            Element::Item => item,
            Element::Path => directory,
            Element::Base => basename,
        };

        // Regexes carry their own case-insensitivity; everything else folds
        // the selected element to meet the pre-folded values.
        let matched = if self.case_sensitive || matches!(self.matcher, Matcher::Regex(_)) {
            self.matcher.matches(selected)
        } else {
            self.matcher.matches(&selected.to_lowercase())
        };

        matched != self.negate
    }
}

fn fold_values(matcher: Matcher) -> Matcher {
    fn fold(values: Vec<String>) -> Vec<String> {
        values.into_iter().map(|v| v.to_lowercase()).collect()
    }
    match matcher {
        Matcher::Is(v) => Matcher::Is(fold(v)),
        Matcher::Starts(v) => Matcher::Starts(fold(v)),
        Matcher::Ends(v) => Matcher::Ends(fold(v)),
        Matcher::Contains(v) => Matcher::Contains(fold(v)),
        Matcher::Regex(patterns) => Matcher::Regex(patterns),
    }
}

/// A named, validated rule.
#[derive(Clone, Debug)]
pub struct Rule {
    pub name: String,
    pub comment: Option<String>,
    pub combinator: Combinator,
    pub conditions: Vec<Condition>,
}

impl Rule {
    /// Evaluate the conditions in declaration order.
    ///
    /// OR returns true at the first matching condition; AND returns false
    /// at the first failing one. A rule with no conditions never matches.
    pub fn matches(&self, item: &str, directory: &str, basename: &str) -> bool {
        if self.conditions.is_empty() {
            return false;
        }
        match self.combinator {
            Combinator::Or => self
                .conditions
                .iter()
                .any(|c| c.matches(item, directory, basename)),
            Combinator::And => self
                .conditions
                .iter()
                .all(|c| c.matches(item, directory, basename)),
        }
    }
}
