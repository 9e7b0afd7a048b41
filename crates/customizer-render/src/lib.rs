//! Render side of the customizer.
//!
//! Turns setting changes into safe, injectable style text:
//! - `sanitize`: allow-list validation of untrusted CSS values
//! - `rules`: static and pattern-based key -> declaration registry
//! - `cache`: last accepted fragment per key
//! - `pipeline`: per-frame batching, flush, sink write, stats
//! - `sink` / `frames`: injectable render target and frame clock

pub mod cache;
pub mod frames;
pub mod perf;
pub mod pipeline;
pub mod rules;
pub mod sanitize;
pub mod sink;

pub use cache::RenderCache;
pub use frames::{FrameScheduler, IntervalFrames, YieldFrames};
pub use perf::{RenderStats, RenderStatsSnapshot};
pub use pipeline::{PipelineBuilder, PipelineOptions, RenderPipeline};
pub use rules::{default_registry, Declaration, PatternRule, RenderRule, RuleRegistry, RuleTarget};
pub use sanitize::{sanitize, sanitize_stylesheet, sanitize_value, PropertyClass, SanitizedValue};
pub use sink::{FileSink, MemorySink, StyleSink};
