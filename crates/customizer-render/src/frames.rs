//! Frame schedulers: when a batched flush is allowed to run.

use std::time::Duration;

use async_trait::async_trait;

/// Resolves at the start of the next render frame.
#[async_trait]
pub trait FrameScheduler: Send + Sync {
    async fn next_frame(&self);
}

/// Fixed-period frames, 16ms (~60 fps) by default.
#[derive(Debug, Clone, Copy)]
pub struct IntervalFrames {
    period: Duration,
}

impl IntervalFrames {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl Default for IntervalFrames {
    fn default() -> Self {
        Self::new(Duration::from_millis(16))
    }
}

#[async_trait]
impl FrameScheduler for IntervalFrames {
    async fn next_frame(&self) {
        tokio::time::sleep(self.period).await;
    }
}

/// No frame clock: yield once to the runtime and flush on the next tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct YieldFrames;

#[async_trait]
impl FrameScheduler for YieldFrames {
    async fn next_frame(&self) {
        tokio::task::yield_now().await;
    }
}
