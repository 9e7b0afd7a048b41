//! Tests for the full validation pipeline.

use super::*;
use crate::schema::*;

fn rule(key: &str, selector: &str, property: &str) -> CustomRuleConfig {
    CustomRuleConfig {
        key: key.into(),
        selector: selector.into(),
        property: property.into(),
        important: false,
    }
}

#[test]
fn default_config_validates() {
    let config = CustomizerConfig::default();
    assert!(validate(&config).is_ok());
}

#[test]
fn catches_too_many_retries() {
    let mut config = CustomizerConfig::default();
    config.dispatch.max_retries = 11;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("dispatch.max_retries"));
}

#[test]
fn catches_tiny_timeout() {
    let mut config = CustomizerConfig::default();
    config.dispatch.request_timeout_ms = 5;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("dispatch.request_timeout_ms"));
}

#[test]
fn catches_zero_history() {
    let mut config = CustomizerConfig::default();
    config.dispatch.history_capacity = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("dispatch.history_capacity"));
}

#[test]
fn catches_non_http_endpoint() {
    let mut config = CustomizerConfig::default();
    config.endpoint.url = "ftp://example.com".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("endpoint.url"));
}

#[test]
fn catches_zero_frame_interval() {
    let mut config = CustomizerConfig::default();
    config.render.frame_interval_ms = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("render.frame_interval_ms"));
}

#[test]
fn collects_multiple_errors() {
    let mut config = CustomizerConfig::default();
    config.dispatch.max_retries = 50;
    config.render.stats_window = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("dispatch.max_retries"));
    assert!(err.contains("render.stats_window"));
}

#[test]
fn accepts_well_formed_rules() {
    let mut config = CustomizerConfig::default();
    config.render.rules = vec![
        rule("notice_border_color", ".console-notice", "border-color"),
        rule("logo_width", ".console-logo img", "width"),
    ];
    assert!(validate(&config).is_ok());
}

#[test]
fn rejects_selector_breakout() {
    let mut config = CustomizerConfig::default();
    config.render.rules = vec![rule("x", "body } * { color: red", "color")];
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("render.rules[0].selector"));
}

#[test]
fn rejects_bad_property_and_key() {
    let mut config = CustomizerConfig::default();
    config.render.rules = vec![rule("has space", ".a", "color: red")];
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("render.rules[0].key"));
    assert!(err.contains("render.rules[0].property"));
}

#[test]
fn rejects_duplicate_rule_keys() {
    let mut config = CustomizerConfig::default();
    config.render.rules = vec![rule("a", ".a", "color"), rule("a", ".b", "color")];
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("declared twice"));
}
