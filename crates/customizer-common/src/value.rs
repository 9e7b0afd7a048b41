//! The value carried by a setting-change event.

use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::fmt;

/// A raw, untrusted setting value as produced by a UI control.
///
/// Numbers keep their JSON form, so `14` stays an integer on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Number(Number),
    Text(String),
    Null,
}

impl SettingValue {
    /// `true` for null and for text that is empty after trimming.
    pub fn is_empty(&self) -> bool {
        match self {
            SettingValue::Null => true,
            SettingValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Textual form fed to the sanitizer, or `None` when there is nothing to render.
    pub fn as_css_text(&self) -> Option<String> {
        match self {
            SettingValue::Null => None,
            SettingValue::Text(s) if s.trim().is_empty() => None,
            SettingValue::Text(s) => Some(s.trim().to_string()),
            SettingValue::Number(n) => Some(format_number(n)),
            SettingValue::Bool(b) => Some(b.to_string()),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Bool(b) => Some(*b),
            SettingValue::Text(s) => match s.trim() {
                "1" | "true" | "on" | "yes" => Some(true),
                "0" | "false" | "off" | "no" => Some(false),
                _ => None,
            },
            SettingValue::Number(n) => Some(n.as_f64() != Some(0.0)),
            SettingValue::Null => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

fn format_number(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        Some(f) if n.is_f64() => format!("{f}"),
        _ => n.to_string(),
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_css_text() {
            Some(text) => f.write_str(&text),
            None => f.write_str(""),
        }
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        SettingValue::Text(value.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        SettingValue::Text(value)
    }
}

/// Non-finite floats have no JSON form and become `Null`.
impl From<f64> for SettingValue {
    fn from(value: f64) -> Self {
        Number::from_f64(value).map_or(SettingValue::Null, SettingValue::Number)
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        SettingValue::Number(value.into())
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        SettingValue::Bool(value)
    }
}
