//! The fixed set of patterns that must never reach the style sink.

use regex::Regex;
use std::sync::LazyLock;

static DANGEROUS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)(javascript\s*:|vbscript\s*:|data\s*:\s*text/html|expression\s*\(",
        r"|@import|behavior\s*:|-moz-binding|<\s*/?\s*script|<\s*/?\s*style)",
    ))
    .unwrap()
});

/// Passes of [`strip_dangerous`]; removing one match can splice a new one
/// together (`expreexpression(ssion(`), so stripping repeats until stable.
const MAX_STRIP_PASSES: usize = 8;

pub fn contains_dangerous_pattern(value: &str) -> bool {
    DANGEROUS_RE.is_match(value)
}

pub(super) fn strip_dangerous(css: &str) -> String {
    let mut current = css.to_string();
    for _ in 0..MAX_STRIP_PASSES {
        if !DANGEROUS_RE.is_match(&current) {
            return current;
        }
        current = DANGEROUS_RE.replace_all(&current, "").into_owned();
    }
    // Pathological input, drop it entirely.
    if DANGEROUS_RE.is_match(&current) {
        return String::new();
    }
    current
}
