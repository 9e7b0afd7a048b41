//! Turning one batch of setting changes into cache fragments.

use std::collections::HashSet;

use customizer_common::SettingValue;

use crate::rules::{RenderRule, RuleRegistry, RuleTarget};
use crate::sanitize::{sanitize, sanitize_stylesheet};

/// What one setting change produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Fragment {
    /// Style text to store under the key.
    Rendered(String),
    /// Null or blank value; the cached rule for the key is kept.
    Empty,
    /// No static or pattern rule knows the key.
    NoRule,
    /// The sanitizer refused the value.
    Rejected(String),
}

/// Resolve a batch newest-first, keeping only the last change per key.
pub(crate) fn resolve_batch(
    registry: &RuleRegistry,
    batch: Vec<(String, SettingValue)>,
) -> Vec<(String, Fragment)> {
    let mut seen = HashSet::with_capacity(batch.len());
    let mut resolved = Vec::with_capacity(batch.len());

    for (key, value) in batch.into_iter().rev() {
        if !seen.insert(key.clone()) {
            continue;
        }
        let fragment = render_fragment(registry, &key, &value);
        resolved.push((key, fragment));
    }

    resolved
}

pub(crate) fn render_fragment(
    registry: &RuleRegistry,
    key: &str,
    value: &SettingValue,
) -> Fragment {
    let Some(target) = registry.resolve(key) else {
        return Fragment::NoRule;
    };
    if value.is_empty() {
        return Fragment::Empty;
    }

    match target {
        RuleTarget::Stylesheet => {
            let Some(text) = value.as_css_text() else {
                return Fragment::Empty;
            };
            let cleaned = sanitize_stylesheet(&text);
            if cleaned.as_str().is_empty() {
                Fragment::Rejected(text)
            } else {
                Fragment::Rendered(format!("{cleaned}\n"))
            }
        }
        RuleTarget::Declaration(decl) => {
            let text = match (&decl.flag, value.as_bool()) {
                (Some(flag), Some(true)) => flag.when_true.clone(),
                (Some(flag), Some(false)) => flag.when_false.clone(),
                _ => match value.as_css_text() {
                    Some(text) => text,
                    None => return Fragment::Empty,
                },
            };
            match sanitize(&decl.property, &text) {
                Some(clean) => Fragment::Rendered(RenderRule::new(&decl, clean).to_css()),
                None => Fragment::Rejected(text),
            }
        }
    }
}
