//! Fail-closed validation of declarative rule batches.
//!
//! A batch is a JSON array of rule records. Either every enabled rule in
//! the batch validates, or the whole batch is rejected: scanning with an
//! incompletely specified rule set would silently under-report.

use anyhow::Context;
use pathguard_domain::rules::{Combinator, Condition, Element, Matcher, Rule};
use regex::RegexBuilder;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRule {
    name: String,
    #[serde(default = "default_true")]
    #[allow(dead_code)]
    enabled: bool,
    #[serde(default)]
    comment: Option<String>,
    #[serde(default)]
    and: bool,
    conditions: Vec<RawCondition>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCondition {
    #[serde(default)]
    element: RawElement,
    criteria: RawCriteria,
    value: OneOrMany,
    #[serde(default, rename = "case")]
    case_sensitive: bool,
    #[serde(default)]
    negate: bool,
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RawElement {
    #[default]
    Item,
    Path,
    Base,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RawCriteria {
    Is,
    Starts,
    Ends,
    Contains,
    Regex,
}

/// `value` may be a single string or a list; always a list afterwards.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn into_values(self) -> Vec<String> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

/// Validate one rule batch into typed rules.
///
/// Disabled rules (`"enabled": false`) are skipped before any validation;
/// any other invalid rule rejects the entire batch. Separate batches
/// validate independently.
pub fn parse_rule_batch(input: &str) -> anyhow::Result<Vec<Rule>> {
    let records: Vec<Value> =
        serde_json::from_str(input).context("rule batch must be a JSON array of rules")?;

    let mut rules = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        if record.get("enabled").and_then(Value::as_bool) == Some(false) {
            debug!(rule = index, "rule is disabled, skipping");
            continue;
        }

        let raw: RawRule = serde_json::from_value(record)
            .with_context(|| format!("rule {index} is invalid"))?;
        rules.push(build_rule(raw, index)?);
    }

    Ok(rules)
}

fn build_rule(raw: RawRule, index: usize) -> anyhow::Result<Rule> {
    let combinator = if raw.and {
        Combinator::And
    } else {
        Combinator::Or
    };

    let mut conditions = Vec::with_capacity(raw.conditions.len());
    for (ci, condition) in raw.conditions.into_iter().enumerate() {
        conditions.push(build_condition(condition).with_context(|| {
            format!("rule {index} ({:?}), condition {ci} is invalid", raw.name)
        })?);
    }

    Ok(Rule {
        name: raw.name,
        comment: raw.comment,
        combinator,
        conditions,
    })
}

fn build_condition(raw: RawCondition) -> anyhow::Result<Condition> {
    let values = raw.value.into_values();

    let element = match raw.element {
        RawElement::Item => Element::Item,
        RawElement::Path => Element::Path,
        RawElement::Base => Element::Base,
    };

    let matcher = match raw.criteria {
        RawCriteria::Is => Matcher::Is(values),
        RawCriteria::Starts => Matcher::Starts(values),
        RawCriteria::Ends => Matcher::Ends(values),
        RawCriteria::Contains => Matcher::Contains(values),
        RawCriteria::Regex => {
            let mut patterns = Vec::with_capacity(values.len());
            for value in values {
                let pattern = RegexBuilder::new(&value)
                    .case_insensitive(!raw.case_sensitive)
                    .build()
                    .with_context(|| format!("invalid regex {value:?}"))?;
                patterns.push(pattern);
            }
            Matcher::Regex(patterns)
        }
    };

    Ok(Condition::new(
        element,
        matcher,
        raw.case_sensitive,
        raw.negate,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_batch_parses_in_order() {
        let rules = parse_rule_batch(
            r#"[
                {"name": "temp_exe", "and": true, "conditions": [
                    {"criteria": "contains", "value": "temp"},
                    {"element": "base", "criteria": "ends", "value": [".exe", ".dll"]}
                ]},
                {"name": "odd_host", "comment": "lookalikes", "conditions": [
                    {"element": "base", "criteria": "regex", "value": "svch0st"}
                ]}
            ]"#,
        )
        .expect("valid batch");

        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].name, "temp_exe");
        assert_eq!(rules[0].combinator, Combinator::And);
        assert_eq!(rules[1].name, "odd_host");
        assert_eq!(rules[1].combinator, Combinator::Or);
        assert_eq!(rules[1].comment.as_deref(), Some("lookalikes"));
    }

    #[test]
    fn disabled_rule_is_skipped_even_when_invalid() {
        let rules = parse_rule_batch(
            r#"[
                {"name": "broken", "enabled": false, "bogus_key": 1},
                {"name": "kept", "conditions": [{"criteria": "is", "value": "x"}]}
            ]"#,
        )
        .expect("disabled rules skip validation");

        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].name, "kept");
    }

    #[test]
    fn unknown_rule_key_rejects_the_batch() {
        let err = parse_rule_batch(
            r#"[
                {"name": "ok", "conditions": [{"criteria": "is", "value": "x"}]},
                {"name": "bad", "severity": "high", "conditions": []}
            ]"#,
        )
        .expect_err("unknown key");
        assert!(format!("{err:#}").contains("rule 1"));
    }

    #[test]
    fn unknown_criteria_rejects_the_batch() {
        assert!(parse_rule_batch(
            r#"[{"name": "bad", "conditions": [{"criteria": "glob", "value": "*"}]}]"#,
        )
        .is_err());
    }

    #[test]
    fn missing_name_or_conditions_rejects_the_batch() {
        assert!(parse_rule_batch(
            r#"[{"conditions": [{"criteria": "is", "value": "x"}]}]"#
        )
        .is_err());
        assert!(parse_rule_batch(r#"[{"name": "no_conditions"}]"#).is_err());
    }

    #[test]
    fn conditions_must_be_a_list() {
        assert!(parse_rule_batch(r#"[{"name": "bad", "conditions": "x"}]"#).is_err());
    }

    #[test]
    fn non_array_input_is_rejected() {
        assert!(parse_rule_batch(r#"{"name": "not_a_batch"}"#).is_err());
        assert!(parse_rule_batch("").is_err());
    }

    #[test]
    fn invalid_regex_rejects_the_batch() {
        let err = parse_rule_batch(
            r#"[{"name": "bad_re", "conditions": [{"criteria": "regex", "value": "["}]}]"#,
        )
        .expect_err("bad pattern");
        assert!(format!("{err:#}").contains("bad_re"));
    }

    #[test]
    fn scalar_value_is_normalized_to_a_list() {
        let rules = parse_rule_batch(
            r#"[{"name": "scalar", "conditions": [{"criteria": "contains", "value": "temp"}]}]"#,
        )
        .expect("scalar value");
        assert!(rules[0].matches(r"c:\temp\x.exe", "temp", "x.exe"));
    }

    #[test]
    fn parsed_rules_fold_values_for_insensitive_match() {
        let rules = parse_rule_batch(
            r#"[{"name": "folded", "conditions": [{"element": "base", "criteria": "is", "value": "CMD.EXE"}]}]"#,
        )
        .expect("parse");
        assert!(rules[0].matches(r"c:\windows\system32\cmd.exe", r"windows\system32", "cmd.exe"));
    }
}
