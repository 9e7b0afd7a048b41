//! Flush timing and throughput counters.

use std::collections::VecDeque;
use std::time::Duration;

use serde::Serialize;

/// Counters updated after every flush.
#[derive(Debug, Clone)]
pub struct RenderStats {
    total_updates: u64,
    flushes: u64,
    total_time: Duration,
    samples: VecDeque<Duration>,
    max_samples: usize,
    last_length: usize,
    last_flush_at: Option<i64>,
}

/// Read-only view of [`RenderStats`].
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RenderStatsSnapshot {
    /// Setting changes applied, after per-flush deduplication.
    pub total_updates: u64,
    pub flushes: u64,
    pub total_time_ms: f64,
    /// Mean flush duration over the rolling window.
    pub average_time_ms: f64,
    pub last_length: usize,
    pub last_flush_at: Option<i64>,
}

impl RenderStats {
    pub fn new(max_samples: usize) -> Self {
        Self {
            total_updates: 0,
            flushes: 0,
            total_time: Duration::ZERO,
            samples: VecDeque::with_capacity(max_samples),
            max_samples: max_samples.max(1),
            last_length: 0,
            last_flush_at: None,
        }
    }

    pub fn record(&mut self, updates: usize, elapsed: Duration, length: usize, at: i64) {
        self.total_updates += updates as u64;
        self.flushes += 1;
        self.total_time += elapsed;
        self.samples.push_back(elapsed);
        if self.samples.len() > self.max_samples {
            self.samples.pop_front();
        }
        self.last_length = length;
        self.last_flush_at = Some(at);
    }

    pub fn average_time_ms(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let total: f64 = self.samples.iter().map(|d| d.as_secs_f64()).sum();
        (total / self.samples.len() as f64) * 1000.0
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub fn snapshot(&self) -> RenderStatsSnapshot {
        RenderStatsSnapshot {
            total_updates: self.total_updates,
            flushes: self.flushes,
            total_time_ms: self.total_time.as_secs_f64() * 1000.0,
            average_time_ms: self.average_time_ms(),
            last_length: self.last_length,
            last_flush_at: self.last_flush_at,
        }
    }
}

impl Default for RenderStats {
    fn default() -> Self {
        Self::new(100)
    }
}
