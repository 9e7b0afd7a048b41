//! Lookup from setting key to [`RuleTarget`].
//!
//! Static entries are tried first, then pattern rules in registration
//! order. A pattern rule is a regex with a named `target` capture plus a
//! table mapping each known target onto a selector, so
//! `sidebar_font_size` resolves through `^(?P<target>[a-z]+)_font_size$`
//! to a `font-size` declaration on the sidebar selector.

use std::collections::HashMap;

use customizer_config::CustomRuleConfig;
use regex::Regex;
use tracing::debug;

use super::{Declaration, RuleTarget};

#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("invalid rule pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("rule pattern '{0}' has no named `target` group")]
    MissingTarget(String),
}

/// A declarative dynamic rule.
#[derive(Debug, Clone)]
pub struct PatternRule {
    pattern: Regex,
    property: String,
    important: bool,
    targets: HashMap<String, String>,
}

impl PatternRule {
    /// `pattern` must contain a named `target` capture group.
    pub fn new(pattern: &str, property: impl Into<String>) -> Result<Self, RuleError> {
        let pattern = Regex::new(pattern)?;
        if !pattern.capture_names().flatten().any(|n| n == "target") {
            return Err(RuleError::MissingTarget(pattern.as_str().to_string()));
        }
        Ok(Self {
            pattern,
            property: property.into(),
            important: false,
            targets: HashMap::new(),
        })
    }

    pub fn important(mut self) -> Self {
        self.important = true;
        self
    }

    /// Register the selector used when the `target` capture equals `name`.
    pub fn target(mut self, name: impl Into<String>, selector: impl Into<String>) -> Self {
        self.targets.insert(name.into(), selector.into());
        self
    }

    pub fn resolve(&self, key: &str) -> Option<Declaration> {
        let caps = self.pattern.captures(key)?;
        let selector = self.targets.get(caps.name("target")?.as_str())?;
        Some(Declaration {
            selector: selector.clone(),
            property: self.property.clone(),
            important: self.important,
            flag: None,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    fixed: HashMap<String, RuleTarget>,
    patterns: Vec<PatternRule>,
}

impl RuleRegistry {
    /// An empty registry. See [`super::default_registry`] for the built-in table.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, target: RuleTarget) -> &mut Self {
        self.fixed.insert(key.into(), target);
        self
    }

    pub fn declare(&mut self, key: impl Into<String>, declaration: Declaration) -> &mut Self {
        self.insert(key, RuleTarget::Declaration(declaration))
    }

    pub fn add_pattern(&mut self, rule: PatternRule) -> &mut Self {
        self.patterns.push(rule);
        self
    }

    /// Add the `[[render.rules]]` entries from config, overriding built-ins.
    pub fn extend_from_config(&mut self, rules: &[CustomRuleConfig]) -> &mut Self {
        for rule in rules {
            debug!(key = %rule.key, selector = %rule.selector, "registering configured rule");
            let mut decl = Declaration::new(rule.selector.trim(), rule.property.trim());
            decl.important = rule.important;
            self.declare(rule.key.clone(), decl);
        }
        self
    }

    pub fn resolve(&self, key: &str) -> Option<RuleTarget> {
        if let Some(target) = self.fixed.get(key) {
            return Some(target.clone());
        }
        self.patterns
            .iter()
            .find_map(|p| p.resolve(key))
            .map(RuleTarget::Declaration)
    }

    pub fn len(&self) -> usize {
        self.fixed.len() + self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixed.is_empty() && self.patterns.is_empty()
    }
}
