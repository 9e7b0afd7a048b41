//! Update dispatcher tuning.

use serde::{Deserialize, Serialize};

/// Retry, timeout and bookkeeping limits for the update dispatcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Retries after the first attempt (valid range: 0-10).
    pub max_retries: u32,
    /// Backoff base; attempt `n` waits `base_delay_ms * 2^n` (valid range: 10-60000).
    pub base_delay_ms: u64,
    /// Per-attempt ceiling (valid range: 100-300000).
    pub request_timeout_ms: u64,
    /// Pause between consecutive requests (valid range: 0-10000).
    pub inter_request_delay_ms: u64,
    /// Outcomes kept for stats (valid range: 1-10000).
    pub history_capacity: usize,
    /// Window for the "recent" count in stats, in seconds.
    pub recent_window_secs: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1000,
            request_timeout_ms: 30_000,
            inter_request_delay_ms: 100,
            history_capacity: 50,
            recent_window_secs: 300,
        }
    }
}
