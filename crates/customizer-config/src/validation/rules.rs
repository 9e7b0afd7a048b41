//! Validation of user-declared `[[render.rules]]`.

use crate::schema::CustomRuleConfig;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static KEY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.\-]+$").unwrap());

static PROPERTY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[a-z][a-z0-9\-]*$").unwrap());

/// Characters that would let a selector escape its rule block.
const SELECTOR_FORBIDDEN: [char; 6] = ['{', '}', ';', '<', '>', '\\'];

pub(crate) fn validate_rules(errors: &mut Vec<String>, rules: &[CustomRuleConfig]) {
    let mut seen = HashSet::new();

    for (i, rule) in rules.iter().enumerate() {
        let name = format!("render.rules[{i}]");

        if !KEY_RE.is_match(&rule.key) {
            errors.push(format!("{name}.key = '{}' is not a valid setting key", rule.key));
        } else if !seen.insert(rule.key.as_str()) {
            errors.push(format!("{name}.key = '{}' is declared twice", rule.key));
        }

        let selector = rule.selector.trim();
        if selector.is_empty() {
            errors.push(format!("{name}.selector is empty"));
        } else if let Some(ch) = selector.chars().find(|c| SELECTOR_FORBIDDEN.contains(c)) {
            errors.push(format!("{name}.selector contains forbidden character '{ch}'"));
        }

        if !PROPERTY_RE.is_match(&rule.property) {
            errors.push(format!(
                "{name}.property = '{}' is not a CSS property name",
                rule.property
            ));
        }
    }
}
