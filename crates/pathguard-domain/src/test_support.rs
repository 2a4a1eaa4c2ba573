use crate::resolver::{AliasTables, Resolver};
use crate::rules::{Combinator, Condition, Element, Matcher, Rule};
use regex::RegexBuilder;

pub fn resolver() -> Resolver {
    Resolver::new(AliasTables::default())
}

/// A case-insensitive, non-negated condition.
pub fn condition(element: Element, matcher: Matcher) -> Condition {
    Condition::new(element, matcher, false, false)
}

pub fn regex_condition(element: Element, pattern: &str, case_sensitive: bool) -> Condition {
    let regex = RegexBuilder::new(pattern)
        .case_insensitive(!case_sensitive)
        .build()
        .expect("test pattern compiles");
    Condition::new(element, Matcher::Regex(vec![regex]), case_sensitive, false)
}

pub fn rule(name: &str, combinator: Combinator, conditions: Vec<Condition>) -> Rule {
    Rule {
        name: name.to_string(),
        comment: None,
        combinator,
        conditions,
    }
}
