//! Validation and normalisation of untrusted style values.
//!
//! Every value that reaches the style sink passes through here first.
//! Values are classified by the CSS property they are destined for:
//!
//! - Color properties: `#rgb`, `#rrggbb`, `rgb()`/`rgba()` with clamped
//!   channels, or a small allow-list of named colors and CSS keywords
//! - Size properties: `<number><unit>` for a fixed unit set, bare numbers
//!   (promoted to `px` unless the property is unitless), or a keyword
//!   allow-list
//! - Everything else: rejected on any dangerous pattern, then restricted
//!   to a conservative character set
//!
//! [`sanitize_stylesheet`] handles free-form custom CSS by stripping
//! dangerous fragments instead of rejecting the whole text. It is a
//! best-effort filter and NOT a complete XSS boundary; hosts that accept
//! custom CSS from untrusted users need an additional server-side check.
//!
//! All functions are pure and total: they never panic and never log.

mod color;
mod patterns;
mod size;


use std::fmt;

pub use patterns::contains_dangerous_pattern;

// =============================================================================
// TYPES
// =============================================================================

/// A value that has passed the sanitizer.
///
/// Only this module can construct one, so anything holding a
/// `SanitizedValue` is known to be safe to emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedValue(String);

impl SanitizedValue {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for SanitizedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a CSS property's value is validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyClass {
    Color,
    Size,
    Generic,
}

const SIZE_PROPERTIES: &[&str] = &[
    "width",
    "height",
    "min-width",
    "max-width",
    "min-height",
    "max-height",
    "font-size",
    "font-weight",
    "line-height",
    "letter-spacing",
    "word-spacing",
    "text-indent",
    "border-radius",
    "border-width",
    "outline-width",
    "outline-offset",
    "gap",
    "row-gap",
    "column-gap",
    "top",
    "right",
    "bottom",
    "left",
    "opacity",
    "z-index",
];

/// Properties whose bare numbers are meaningful without a unit.
const UNITLESS_PROPERTIES: &[&str] = &["font-weight", "line-height", "opacity", "z-index"];

impl PropertyClass {
    pub fn of(property: &str) -> Self {
        let p = property.trim().to_ascii_lowercase();

        if p == "color"
            || p.ends_with("-color")
            || p == "background"
            || p == "fill"
            || p == "stroke"
        {
            return PropertyClass::Color;
        }

        if SIZE_PROPERTIES.contains(&p.as_str())
            || p.starts_with("padding")
            || p.starts_with("margin")
        {
            return PropertyClass::Size;
        }

        PropertyClass::Generic
    }
}

// =============================================================================
// SANITIZATION
// =============================================================================

/// Sanitize `raw` for use as the value of `property`.
///
/// Returns the normalised value, or `None` if it is rejected.
pub fn sanitize_value(property: &str, raw: &str) -> Option<String> {
    sanitize(property, raw).map(SanitizedValue::into_string)
}

/// Typed form of [`sanitize_value`].
pub fn sanitize(property: &str, raw: &str) -> Option<SanitizedValue> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || contains_dangerous_pattern(trimmed) {
        return None;
    }

    let value = match PropertyClass::of(property) {
        PropertyClass::Color => color::sanitize_color(trimmed),
        PropertyClass::Size => {
            let property = property.trim().to_ascii_lowercase();
            let unitless = UNITLESS_PROPERTIES.contains(&property.as_str());
            size::sanitize_size(trimmed, unitless)
        }
        PropertyClass::Generic => sanitize_generic(trimmed),
    }?;

    Some(SanitizedValue(value))
}

/// Strip dangerous fragments from a free-form stylesheet.
///
/// Degrades instead of rejecting: whatever survives is returned, possibly
/// empty. See the module docs for the limits of this filter.
pub fn sanitize_stylesheet(css: &str) -> SanitizedValue {
    SanitizedValue(patterns::strip_dangerous(css).trim().to_string())
}

// =============================================================================
// HELPERS
// =============================================================================

/// Characters allowed in a generic (free-text) property value.
fn is_generic_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric()
        || matches!(
            ch,
            ' ' | '#' | '%' | '.' | ',' | '-' | '_' | '(' | ')' | '\'' | '"' | '/' | '+'
        )
}

fn sanitize_generic(value: &str) -> Option<String> {
    if value.to_ascii_lowercase().contains("url(") {
        return None;
    }
    if !value.chars().all(is_generic_char) {
        return None;
    }
    Some(value.to_string())
}
