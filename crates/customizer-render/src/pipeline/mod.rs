//! Render pipeline: batched, sanitized, cached style generation.
//!
//! Setting changes are queued with [`RenderPipeline::enqueue`] and
//! applied together on the next frame. A flush resolves the batch
//! newest-first (last write per key wins), sanitizes each value, updates
//! the [`RenderCache`] and writes the concatenated cache to the sink in a
//! single `replace`. Changes that arrive while a flush is running are
//! picked up by a follow-up flush after a short fixed delay. Flushes never
//! overlap, and a batch taken before a `clear` is dropped rather than
//! written into the emptied cache.
//!
//! A failed sink write leaves the cache ahead of the sink until the next
//! successful flush. [`RenderPipeline::flush_now`] returns the error;
//! failures of scheduled flushes are kept for
//! [`RenderPipeline::take_sink_error`].
//!
//! All scheduling happens on the ambient Tokio runtime, so `enqueue`,
//! `reload` and the builder's `build` must be called from within one.

mod flush;

#[cfg(test)]
mod tests;

use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use customizer_common::{now_millis, Event, EventBus, SettingValue};
use customizer_config::RenderConfig;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::cache::RenderCache;
use crate::frames::{FrameScheduler, IntervalFrames};
use crate::perf::{RenderStats, RenderStatsSnapshot};
use crate::rules::{default_registry, RuleRegistry};
use crate::sink::StyleSink;
use flush::{resolve_batch, Fragment};

// =============================================================================
// OPTIONS & BUILDER
// =============================================================================

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Delay before re-flushing changes that arrived during a flush.
    pub reschedule_delay: Duration,
    /// Flush durations kept for the rolling average.
    pub stats_window: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            reschedule_delay: Duration::from_millis(10),
            stats_window: 100,
        }
    }
}

pub struct PipelineBuilder {
    registry: RuleRegistry,
    frames: Arc<dyn FrameScheduler>,
    options: PipelineOptions,
    events: EventBus,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self {
            registry: default_registry(),
            frames: Arc::new(IntervalFrames::default()),
            options: PipelineOptions::default(),
            events: EventBus::default(),
        }
    }

    /// Built-in rules plus `[[render.rules]]`, frame period and delays from config.
    pub fn from_config(config: &RenderConfig) -> Self {
        let mut registry = default_registry();
        registry.extend_from_config(&config.rules);
        Self::new()
            .registry(registry)
            .frames(IntervalFrames::new(Duration::from_millis(
                config.frame_interval_ms,
            )))
            .options(PipelineOptions {
                reschedule_delay: Duration::from_millis(config.reschedule_delay_ms),
                stats_window: config.stats_window,
            })
    }

    pub fn registry(mut self, registry: RuleRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn frames(mut self, frames: impl FrameScheduler + 'static) -> Self {
        self.frames = Arc::new(frames);
        self
    }

    pub fn options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    /// Publish `RenderUpdated` on a shared bus instead of a private one.
    pub fn events(mut self, events: EventBus) -> Self {
        self.events = events;
        self
    }

    pub fn build(self, sink: impl StyleSink + 'static) -> RenderPipeline {
        let stats = RenderStats::new(self.options.stats_window);
        RenderPipeline {
            shared: Arc::new(Shared {
                registry: self.registry,
                frames: self.frames,
                options: self.options,
                events: self.events,
                state: Mutex::new(RenderState {
                    cache: RenderCache::new(),
                    pending: Vec::new(),
                    flush_scheduled: false,
                    generation: 0,
                    sink_error: None,
                    stats,
                }),
                sink: Mutex::new(Box::new(sink)),
                flushing: Mutex::new(()),
            }),
        }
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// PIPELINE
// =============================================================================

/// Handle to a render pipeline. Clones share the same cache and sink.
#[derive(Clone)]
pub struct RenderPipeline {
    shared: Arc<Shared>,
}

struct Shared {
    registry: RuleRegistry,
    frames: Arc<dyn FrameScheduler>,
    options: PipelineOptions,
    events: EventBus,
    state: Mutex<RenderState>,
    sink: Mutex<Box<dyn StyleSink>>,
    /// Held for the whole of a flush. Lock order: flushing, state, sink.
    flushing: Mutex<()>,
}

struct RenderState {
    cache: RenderCache,
    pending: Vec<(String, SettingValue)>,
    flush_scheduled: bool,
    /// Bumped by `clear`; a flush whose batch predates it is dropped.
    generation: u64,
    sink_error: Option<io::Error>,
    stats: RenderStats,
}

impl RenderPipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Pipeline with the built-in rules, 16ms frames and default options.
    pub fn new(sink: impl StyleSink + 'static) -> Self {
        PipelineBuilder::new().build(sink)
    }

    /// Queue a setting change for the next frame.
    pub fn enqueue(&self, key: impl Into<String>, value: impl Into<SettingValue>) {
        let key = key.into();
        let value = value.into();
        debug!(key = %key, "render change queued");

        let needs_schedule = {
            let mut state = self.shared.lock_state();
            state.pending.push((key, value));
            !std::mem::replace(&mut state.flush_scheduled, true)
        };

        if needs_schedule {
            self.shared.schedule(None);
        }
    }

    /// Empty the cache, drop queued changes and blank the sink.
    ///
    /// A flush already resolving an older batch discards it.
    pub fn clear(&self) {
        let mut state = self.shared.lock_state();
        state.cache.clear();
        state.pending.clear();
        state.generation += 1;
        if let Err(e) = self.shared.lock_sink().replace("") {
            warn!(error = %e, "failed to blank style sink");
            state.sink_error = Some(e);
        }
        debug!(generation = state.generation, "render cache cleared");
    }

    /// Clear, then queue every setting as if it had just changed.
    pub fn reload<I, K, V>(&self, settings: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<SettingValue>,
    {
        self.clear();
        let mut count = 0usize;
        for (key, value) in settings {
            self.enqueue(key, value);
            count += 1;
        }
        debug!(count, "render pipeline reloaded");
    }

    /// Flush queued changes immediately instead of waiting for the frame.
    ///
    /// Waits for a flush that is already running, then applies whatever
    /// is still queued.
    pub fn flush_now(&self) -> io::Result<()> {
        self.shared.flush()
    }

    /// The last sink failure from a scheduled flush or `clear`, if any.
    pub fn take_sink_error(&self) -> Option<io::Error> {
        self.shared.lock_state().sink_error.take()
    }

    /// The style text currently applied.
    pub fn css(&self) -> String {
        self.shared.lock_state().cache.css()
    }

    pub fn cached(&self, key: &str) -> Option<String> {
        self.shared.lock_state().cache.get(key).map(str::to_string)
    }

    pub fn cache_len(&self) -> usize {
        self.shared.lock_state().cache.len()
    }

    pub fn pending_len(&self) -> usize {
        self.shared.lock_state().pending.len()
    }

    pub fn is_flush_scheduled(&self) -> bool {
        self.shared.lock_state().flush_scheduled
    }

    pub fn stats(&self) -> RenderStatsSnapshot {
        self.shared.lock_state().stats.snapshot()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.shared.events.subscribe()
    }
}

impl Shared {
    fn lock_state(&self) -> MutexGuard<'_, RenderState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_sink(&self) -> MutexGuard<'_, Box<dyn StyleSink>> {
        self.sink.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run a flush after the next frame, or after `delay` when given.
    fn schedule(self: &Arc<Self>, delay: Option<Duration>) {
        let shared = Arc::clone(self);
        tokio::spawn(async move {
            match delay {
                Some(delay) => tokio::time::sleep(delay).await,
                None => shared.frames.next_frame().await,
            }
            if let Err(e) = shared.flush() {
                shared.lock_state().sink_error = Some(e);
            }
        });
    }

    fn flush(self: &Arc<Self>) -> io::Result<()> {
        let _flushing = self.flushing.lock().unwrap_or_else(PoisonError::into_inner);
        let (batch, generation) = {
            let mut state = self.lock_state();
            (std::mem::take(&mut state.pending), state.generation)
        };
        let started = Instant::now();
        let resolved = resolve_batch(&self.registry, batch);
        let updates = resolved.len();

        let (written, more) = {
            let mut state = self.lock_state();
            let written = if state.generation == generation {
                Some(self.apply(&mut state, resolved, started))
            } else {
                debug!(updates, "cache cleared during flush, batch dropped");
                None
            };

            let more = !state.pending.is_empty();
            if !more {
                state.flush_scheduled = false;
            }
            (written, more)
        };

        if more {
            self.schedule(Some(self.options.reschedule_delay));
        }

        match written {
            Some(Ok(length)) => {
                debug!(updates, length, "render flush complete");
                self.events.publish(Event::RenderUpdated {
                    length,
                    timestamp: now_millis(),
                });
                Ok(())
            }
            Some(Err(e)) => {
                warn!(error = %e, "failed to write style sink");
                Err(e)
            }
            None => Ok(()),
        }
    }

    /// Store resolved fragments and write the whole cache to the sink.
    fn apply(
        &self,
        state: &mut RenderState,
        resolved: Vec<(String, Fragment)>,
        started: Instant,
    ) -> io::Result<usize> {
        let updates = resolved.len();
        for (key, fragment) in resolved {
            match fragment {
                Fragment::Rendered(css) => {
                    state.cache.insert(key, css);
                }
                Fragment::Empty => debug!(key = %key, "empty value, keeping cached rule"),
                Fragment::NoRule => debug!(key = %key, "no render rule for setting"),
                Fragment::Rejected(value) => {
                    warn!(key = %key, value = %value, "setting value rejected by sanitizer")
                }
            }
        }

        let css = state.cache.css();
        self.lock_sink().replace(&css)?;
        state
            .stats
            .record(updates, started.elapsed(), css.len(), now_millis());
        Ok(css.len())
    }
}
