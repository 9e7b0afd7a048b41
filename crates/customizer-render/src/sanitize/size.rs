//! Length / numeric value validation.

use regex::Regex;
use std::sync::LazyLock;

static SIZE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([+-]?(?:\d+(?:\.\d+)?|\.\d+))(px|em|rem|%|vh|vw|vmin|vmax|pt|ch|ex)?$")
        .unwrap()
});

const SIZE_KEYWORDS: &[&str] = &[
    "auto", "inherit", "initial", "unset", "normal", "none", "bold", "bolder", "lighter",
];

/// `unitless` keeps bare numbers as-is instead of promoting them to `px`.
pub(super) fn sanitize_size(value: &str, unitless: bool) -> Option<String> {
    if let Some(caps) = SIZE_RE.captures(value) {
        let number = &caps[1];
        return Some(match caps.get(2) {
            Some(unit) => format!("{number}{}", unit.as_str().to_ascii_lowercase()),
            None if unitless => number.to_string(),
            None => format!("{number}px"),
        });
    }

    let lower = value.to_ascii_lowercase();
    if SIZE_KEYWORDS.contains(&lower.as_str()) {
        return Some(lower);
    }

    None
}
