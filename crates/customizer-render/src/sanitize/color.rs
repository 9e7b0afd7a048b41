//! Color value validation.

use regex::Regex;
use std::sync::LazyLock;

/// `#rgb` or `#rrggbb`.
static HEX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").unwrap());

/// `rgb(...)` / `rgba(...)` with the argument list captured.
static RGB_FN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(rgba?)\(\s*([^()]*?)\s*\)$").unwrap());

const NAMED_COLORS: &[&str] = &[
    "transparent",
    "currentcolor",
    "inherit",
    "initial",
    "unset",
    "black",
    "white",
    "red",
    "green",
    "blue",
    "yellow",
    "orange",
    "purple",
    "pink",
    "brown",
    "gray",
    "grey",
    "silver",
    "navy",
    "teal",
    "maroon",
    "olive",
    "lime",
    "aqua",
    "fuchsia",
];

pub(super) fn sanitize_color(value: &str) -> Option<String> {
    if HEX_RE.is_match(value) {
        return Some(value.to_string());
    }

    if let Some(caps) = RGB_FN_RE.captures(value) {
        let with_alpha = caps[1].eq_ignore_ascii_case("rgba");
        return sanitize_rgb_args(&caps[2], with_alpha);
    }

    let lower = value.to_ascii_lowercase();
    if NAMED_COLORS.contains(&lower.as_str()) {
        return Some(lower);
    }

    None
}

/// Re-emit `rgb()`/`rgba()` with channels clamped to `[0, 255]` and alpha to `[0, 1]`.
fn sanitize_rgb_args(args: &str, with_alpha: bool) -> Option<String> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    let expected = if with_alpha { 4 } else { 3 };
    if parts.len() != expected {
        return None;
    }

    let mut numbers = Vec::with_capacity(expected);
    for part in &parts {
        let n: f64 = part.parse().ok()?;
        if !n.is_finite() {
            return None;
        }
        numbers.push(n);
    }

    let channel = |n: f64| n.clamp(0.0, 255.0).round() as u8;
    let (r, g, b) = (channel(numbers[0]), channel(numbers[1]), channel(numbers[2]));

    if with_alpha {
        let a = (numbers[3].clamp(0.0, 1.0) * 1000.0).round() / 1000.0;
        Some(format!("rgba({r}, {g}, {b}, {a})"))
    } else {
        Some(format!("rgb({r}, {g}, {b})"))
    }
}
