//! Render pipeline tuning and user-declared rules.

use serde::{Deserialize, Serialize};

/// An extra static rule mapping a setting key onto one CSS declaration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomRuleConfig {
    pub key: String,
    pub selector: String,
    pub property: String,
    #[serde(default)]
    pub important: bool,
}

/// Render pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Frame period used to batch changes (valid range: 1-1000).
    pub frame_interval_ms: u64,
    /// Delay before re-flushing changes that arrived mid-flush (valid range: 0-1000).
    pub reschedule_delay_ms: u64,
    /// Number of flush durations kept for the rolling average.
    pub stats_window: usize,
    pub rules: Vec<CustomRuleConfig>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 16,
            reschedule_delay_ms: 10,
            stats_window: 100,
            rules: Vec::new(),
        }
    }
}
