//! Render rules: what a setting key turns into once its value is sanitized.

mod defaults;
mod registry;

pub use defaults::default_registry;
pub use registry::{PatternRule, RuleError, RuleRegistry};

use crate::sanitize::SanitizedValue;

/// Values a boolean setting maps onto (e.g. `display: none` / `display: block`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagValues {
    pub when_true: String,
    pub when_false: String,
}

/// Where a setting's value lands: one CSS declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub selector: String,
    pub property: String,
    pub important: bool,
    pub flag: Option<FlagValues>,
}

impl Declaration {
    pub fn new(selector: impl Into<String>, property: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            property: property.into(),
            important: false,
            flag: None,
        }
    }

    pub fn important(mut self) -> Self {
        self.important = true;
        self
    }

    pub fn flag(mut self, when_true: impl Into<String>, when_false: impl Into<String>) -> Self {
        self.flag = Some(FlagValues {
            when_true: when_true.into(),
            when_false: when_false.into(),
        });
        self
    }
}

/// How a setting key is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleTarget {
    Declaration(Declaration),
    /// The value is a whole user stylesheet, emitted after best-effort stripping.
    Stylesheet,
}

/// A sanitized, ready-to-emit style declaration for one setting key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRule {
    pub selector: String,
    pub property: String,
    pub value: SanitizedValue,
    pub important: bool,
}

impl RenderRule {
    pub fn new(declaration: &Declaration, value: SanitizedValue) -> Self {
        Self {
            selector: declaration.selector.clone(),
            property: declaration.property.clone(),
            value,
            important: declaration.important,
        }
    }

    pub fn to_css(&self) -> String {
        let important = if self.important { " !important" } else { "" };
        format!(
            "{} {{ {}: {}{}; }}\n",
            self.selector, self.property, self.value, important
        )
    }
}
