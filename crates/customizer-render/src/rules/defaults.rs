//! Built-in rule table for the console's regions.

use super::{Declaration, PatternRule, RuleRegistry, RuleTarget};

/// Console regions addressable by `<region>_font_size`, `<region>_text_color`
/// and `<region>_bg_color` keys.
const REGIONS: &[(&str, &str)] = &[
    ("topbar", ".console-topbar"),
    ("sidebar", ".console-sidebar"),
    ("content", ".console-content"),
    ("footer", ".console-footer"),
    ("heading", ".console h1, .console h2, .console h3"),
    ("button", ".console .button"),
];

/// `(key suffix, CSS property)` for the region pattern rules.
const REGION_PATTERNS: &[(&str, &str)] = &[
    ("font_size", "font-size"),
    ("text_color", "color"),
    ("bg_color", "background-color"),
];

pub fn default_registry() -> RuleRegistry {
    let mut registry = RuleRegistry::new();

    registry
        .declare("accent_color", Declaration::new(".console a", "color"))
        .declare(
            "link_hover_color",
            Declaration::new(".console a:hover, .console a:focus", "color"),
        )
        .declare(
            "sidebar_width",
            Declaration::new(".console-sidebar", "width").important(),
        )
        .declare(
            "content_max_width",
            Declaration::new(".console-content", "max-width"),
        )
        .declare("topbar_height", Declaration::new(".console-topbar", "height"))
        .declare(
            "border_radius",
            Declaration::new(".console .card, .console .button", "border-radius"),
        )
        .declare(
            "base_font_family",
            Declaration::new("body.console", "font-family"),
        )
        .declare(
            "base_line_height",
            Declaration::new("body.console", "line-height"),
        )
        .declare(
            "hide_footer",
            Declaration::new(".console-footer", "display").flag("none", "block"),
        )
        .insert("custom_css", RuleTarget::Stylesheet);

    for (suffix, property) in REGION_PATTERNS {
        let pattern = format!(r"^(?P<target>[a-z]+)_{suffix}$");
        let Ok(mut rule) = PatternRule::new(&pattern, *property) else {
            continue;
        };
        for (region, selector) in REGIONS {
            rule = rule.target(*region, *selector);
        }
        registry.add_pattern(rule);
    }

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declaration(registry: &RuleRegistry, key: &str) -> Declaration {
        match registry.resolve(key) {
            Some(RuleTarget::Declaration(d)) => d,
            other => panic!("{key}: unexpected target {other:?}"),
        }
    }

    #[test]
    fn region_patterns_resolve() {
        let registry = default_registry();

        let d = declaration(&registry, "topbar_bg_color");
        assert_eq!(d.selector, ".console-topbar");
        assert_eq!(d.property, "background-color");

        let d = declaration(&registry, "heading_font_size");
        assert_eq!(d.property, "font-size");
        assert!(d.selector.contains("h1"));

        let d = declaration(&registry, "footer_text_color");
        assert_eq!(d.property, "color");
    }

    #[test]
    fn custom_css_is_a_stylesheet() {
        assert_eq!(
            default_registry().resolve("custom_css"),
            Some(RuleTarget::Stylesheet)
        );
    }

    #[test]
    fn sidebar_width_is_important() {
        assert!(declaration(&default_registry(), "sidebar_width").important);
    }

    #[test]
    fn unknown_keys_have_no_rule() {
        let registry = default_registry();
        assert!(registry.resolve("dashboard_layout").is_none());
        assert!(registry.resolve("navbar_font_size").is_none());
    }
}
