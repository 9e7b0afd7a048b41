//! Full configuration validation.
//!
//! Validates numeric ranges, the endpoint URL and user-declared render
//! rules, collecting every problem into a single `ConfigError`.

mod helpers;
mod rules;

#[cfg(test)]
mod tests;

use crate::schema::CustomizerConfig;
use customizer_common::ConfigError;
use helpers::{validate_range, validate_range_u64};

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &CustomizerConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_endpoint(&mut errors, config);
    validate_dispatch(&mut errors, config);
    validate_render(&mut errors, config);
    rules::validate_rules(&mut errors, &config.render.rules);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_endpoint(errors: &mut Vec<String>, config: &CustomizerConfig) {
    let url = config.endpoint.url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        errors.push(format!("endpoint.url = '{url}' must be an http(s) URL"));
    }
    validate_range_u64(
        errors,
        "endpoint.connect_timeout_ms",
        config.endpoint.connect_timeout_ms,
        100,
        60_000,
    );
}

fn validate_dispatch(errors: &mut Vec<String>, config: &CustomizerConfig) {
    let d = &config.dispatch;
    validate_range(errors, "dispatch.max_retries", d.max_retries, 0, 10);
    validate_range_u64(errors, "dispatch.base_delay_ms", d.base_delay_ms, 10, 60_000);
    validate_range_u64(
        errors,
        "dispatch.request_timeout_ms",
        d.request_timeout_ms,
        100,
        300_000,
    );
    validate_range_u64(
        errors,
        "dispatch.inter_request_delay_ms",
        d.inter_request_delay_ms,
        0,
        10_000,
    );
    validate_range_u64(
        errors,
        "dispatch.history_capacity",
        d.history_capacity as u64,
        1,
        10_000,
    );
    validate_range_u64(
        errors,
        "dispatch.recent_window_secs",
        d.recent_window_secs,
        1,
        86_400,
    );
}

fn validate_render(errors: &mut Vec<String>, config: &CustomizerConfig) {
    let r = &config.render;
    validate_range_u64(errors, "render.frame_interval_ms", r.frame_interval_ms, 1, 1000);
    validate_range_u64(
        errors,
        "render.reschedule_delay_ms",
        r.reschedule_delay_ms,
        0,
        1000,
    );
    validate_range_u64(errors, "render.stats_window", r.stats_window as u64, 1, 10_000);
}
