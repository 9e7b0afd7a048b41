//! Bounded outcome history and the stats derived from it.

use std::collections::VecDeque;
use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

/// How one request ended.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub action: String,
    pub success: bool,
    /// Attempts made, including the first.
    pub attempts: u32,
    /// Time from submission to settlement.
    pub turnaround: Duration,
    pub finished_at: Instant,
}

/// Most recent outcomes, oldest evicted first.
#[derive(Debug)]
pub struct History {
    entries: VecDeque<Outcome>,
    capacity: usize,
    total: u64,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            total: 0,
        }
    }

    pub fn record(&mut self, outcome: Outcome) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(outcome);
        self.total += 1;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Requests settled since creation, including evicted ones.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn iter(&self) -> impl Iterator<Item = &Outcome> {
        self.entries.iter()
    }

    pub fn stats(&self, queued: usize, active: usize, recent_window: Duration) -> DispatchStats {
        let now = Instant::now();
        let recent = self
            .entries
            .iter()
            .filter(|o| now.saturating_duration_since(o.finished_at) <= recent_window)
            .count();

        let (success_rate, average_turnaround_ms) = if self.entries.is_empty() {
            (0.0, 0.0)
        } else {
            let n = self.entries.len() as f64;
            let successes = self.entries.iter().filter(|o| o.success).count() as f64;
            let total_ms: f64 = self
                .entries
                .iter()
                .map(|o| o.turnaround.as_secs_f64() * 1000.0)
                .sum();
            (successes / n, total_ms / n)
        };

        DispatchStats {
            total: self.total,
            recent,
            queued,
            active,
            success_rate,
            average_turnaround_ms,
        }
    }
}

/// Point-in-time dispatcher statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchStats {
    pub total: u64,
    /// Settled within the recent window.
    pub recent: usize,
    /// Waiting in the queue or for a retry timer.
    pub queued: usize,
    /// 0 or 1.
    pub active: usize,
    /// Fraction of retained outcomes that succeeded, 0.0 when none.
    pub success_rate: f64,
    pub average_turnaround_ms: f64,
}
