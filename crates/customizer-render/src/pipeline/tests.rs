use std::time::Duration;

use super::*;
use crate::frames::YieldFrames;
use crate::rules::Declaration;
use crate::sink::{FileSink, MemorySink};

fn test_registry() -> RuleRegistry {
    let mut registry = default_registry();
    registry
        .declare("color", Declaration::new("body", "color"))
        .declare("width", Declaration::new(".panel", "width"));
    registry
}

fn pipeline() -> (RenderPipeline, MemorySink) {
    let sink = MemorySink::new();
    let pipeline = RenderPipeline::builder()
        .registry(test_registry())
        .build(sink.clone());
    (pipeline, sink)
}

/// Let scheduled frames (16ms) and follow-up flushes run.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(100)).await;
}

#[tokio::test(start_paused = true)]
async fn last_write_wins_within_a_batch() {
    let (pipeline, _sink) = pipeline();

    pipeline.enqueue("color", "#111");
    pipeline.enqueue("color", "#222");
    settle().await;

    let rule = pipeline.cached("color").unwrap();
    assert!(rule.contains("#222"));
    assert!(!rule.contains("#111"));
    assert_eq!(pipeline.cache_len(), 1);
}

#[tokio::test(start_paused = true)]
async fn changes_in_one_frame_are_written_once() {
    let (pipeline, sink) = pipeline();

    pipeline.enqueue("color", "#111");
    pipeline.enqueue("width", 12_i64);
    pipeline.enqueue("accent_color", "rgb(0, 0, 300)");
    assert!(pipeline.is_flush_scheduled());
    assert_eq!(pipeline.pending_len(), 3);
    settle().await;

    assert_eq!(sink.write_count(), 1);
    assert_eq!(pipeline.pending_len(), 0);
    assert!(!pipeline.is_flush_scheduled());
    assert!(sink.contents().contains(".panel { width: 12px; }"));
    assert!(sink.contents().contains("rgb(0, 0, 255)"));
}

#[tokio::test(start_paused = true)]
async fn sink_always_matches_cache() {
    let (pipeline, sink) = pipeline();

    pipeline.enqueue("color", "#abc");
    pipeline.enqueue("sidebar_bg_color", "navy");
    settle().await;
    assert_eq!(sink.contents(), pipeline.css());

    pipeline.enqueue("color", "#def");
    pipeline.enqueue("width", "not a size");
    settle().await;
    assert_eq!(sink.contents(), pipeline.css());
    assert!(sink.contents().contains("#def"));
}

#[tokio::test(start_paused = true)]
async fn empty_value_keeps_previous_rule() {
    let (pipeline, _sink) = pipeline();

    pipeline.enqueue("color", "#111");
    settle().await;
    pipeline.enqueue("color", "");
    pipeline.enqueue("width", SettingValue::Null);
    settle().await;

    assert!(pipeline.cached("color").unwrap().contains("#111"));
    assert!(pipeline.cached("width").is_none());
}

#[tokio::test(start_paused = true)]
async fn rejected_value_keeps_previous_rule() {
    let (pipeline, sink) = pipeline();

    pipeline.enqueue("color", "#111");
    settle().await;
    pipeline.enqueue("color", "javascript:alert(1)");
    settle().await;

    assert!(pipeline.cached("color").unwrap().contains("#111"));
    assert!(!sink.contents().contains("javascript"));
}

#[tokio::test(start_paused = true)]
async fn unknown_keys_render_nothing() {
    let (pipeline, sink) = pipeline();

    pipeline.enqueue("dashboard_layout", "grid");
    settle().await;

    assert_eq!(pipeline.cache_len(), 0);
    assert_eq!(sink.contents(), "");
    assert_eq!(sink.write_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn clear_empties_cache_and_sink() {
    let (pipeline, sink) = pipeline();

    pipeline.enqueue("color", "#111");
    settle().await;
    assert!(!sink.contents().is_empty());

    pipeline.clear();
    assert_eq!(pipeline.cache_len(), 0);
    assert_eq!(sink.contents(), "");
}

#[tokio::test(start_paused = true)]
async fn reload_replaces_previous_state() {
    let (pipeline, sink) = pipeline();

    pipeline.enqueue("color", "#111");
    pipeline.enqueue("width", "10");
    settle().await;

    pipeline.reload(vec![("accent_color", SettingValue::from("#0af"))]);
    settle().await;

    assert_eq!(pipeline.cache_len(), 1);
    assert!(pipeline.cached("color").is_none());
    assert_eq!(sink.contents(), ".console a { color: #0af; }\n");
}

#[tokio::test(start_paused = true)]
async fn later_changes_get_their_own_flush() {
    let (pipeline, sink) = pipeline();

    pipeline.enqueue("color", "#111");
    settle().await;
    pipeline.enqueue("width", "5");
    settle().await;

    let stats = pipeline.stats();
    assert_eq!(stats.flushes, 2);
    assert_eq!(stats.total_updates, 2);
    assert_eq!(sink.write_count(), 2);
    assert_eq!(stats.last_length, sink.contents().len());
    assert!(stats.last_flush_at.is_some());
}

#[tokio::test(start_paused = true)]
async fn stats_count_deduplicated_updates() {
    let (pipeline, _sink) = pipeline();

    for shade in ["#111", "#222", "#333", "#444"] {
        pipeline.enqueue("color", shade);
    }
    settle().await;

    assert_eq!(pipeline.stats().total_updates, 1);
}

#[tokio::test(start_paused = true)]
async fn flush_publishes_render_updated() {
    let (pipeline, sink) = pipeline();
    let mut events = pipeline.subscribe();

    pipeline.enqueue("color", "#111");
    settle().await;

    match events.recv().await.unwrap() {
        Event::RenderUpdated { length, timestamp } => {
            assert_eq!(length, sink.contents().len());
            assert!(timestamp > 0);
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn flush_now_skips_the_frame_wait() {
    let (pipeline, sink) = pipeline();

    pipeline.enqueue("color", "#111");
    pipeline.flush_now().unwrap();

    assert!(sink.contents().contains("#111"));
    assert_eq!(pipeline.pending_len(), 0);
}

#[tokio::test(start_paused = true)]
async fn custom_css_and_flags_render() {
    let (pipeline, sink) = pipeline();

    pipeline.enqueue("hide_footer", true);
    pipeline.enqueue(
        "custom_css",
        ".brand { letter-spacing: 1px; }</style><script>alert(1)</script>",
    );
    settle().await;

    let css = sink.contents();
    assert!(css.contains(".console-footer { display: none; }"));
    assert!(css.contains(".brand { letter-spacing: 1px; }"));
    assert!(!css.to_lowercase().contains("</style"));
    assert!(!css.to_lowercase().contains("<script"));
}

#[tokio::test(start_paused = true)]
async fn configured_rules_are_honoured() {
    let config = RenderConfig {
        rules: vec![customizer_config::CustomRuleConfig {
            key: "notice_border_color".into(),
            selector: ".console-notice".into(),
            property: "border-color".into(),
            important: true,
        }],
        ..RenderConfig::default()
    };
    let sink = MemorySink::new();
    let pipeline = PipelineBuilder::from_config(&config).build(sink.clone());

    pipeline.enqueue("notice_border_color", "#f00");
    settle().await;

    assert_eq!(
        sink.contents(),
        ".console-notice { border-color: #f00 !important; }\n"
    );
}

#[tokio::test]
async fn yield_frames_flush_on_next_tick() {
    let sink = MemorySink::new();
    let pipeline = RenderPipeline::builder()
        .registry(test_registry())
        .frames(YieldFrames)
        .build(sink.clone());

    pipeline.enqueue("color", "#123456");
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert_eq!(sink.contents(), "body { color: #123456; }\n");
}

#[tokio::test(start_paused = true)]
async fn independent_pipelines_share_nothing() {
    let (a, sink_a) = pipeline();
    let (b, sink_b) = pipeline();

    a.enqueue("color", "#aaa");
    b.enqueue("color", "#bbb");
    settle().await;

    assert!(sink_a.contents().contains("#aaa"));
    assert!(sink_b.contents().contains("#bbb"));
    assert!(!sink_a.contents().contains("#bbb"));
}

// =============================================================================
// CONCURRENCY & SINK FAILURES
// =============================================================================

/// Registry with `count` distinct width keys, large enough that resolving
/// one batch takes a noticeable time.
fn wide_registry(count: usize) -> RuleRegistry {
    let mut registry = default_registry();
    for i in 0..count {
        registry.declare(format!("w{i}"), Declaration::new(format!(".p{i}"), "width"));
    }
    registry
}

async fn wait_until_idle(pipeline: &RenderPipeline) {
    tokio::time::timeout(Duration::from_secs(30), async {
        while pipeline.is_flush_scheduled() || pipeline.pending_len() > 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("pipeline never went idle");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn reload_during_flush_drops_the_old_batch() {
    const KEYS: usize = 50_000;
    let sink = MemorySink::new();
    let pipeline = RenderPipeline::builder()
        .registry(wide_registry(KEYS))
        .frames(YieldFrames)
        .build(sink.clone());

    for i in 0..KEYS {
        pipeline.enqueue(format!("w{i}"), i as i64);
    }
    // The frame task has taken the batch and is resolving it.
    while pipeline.pending_len() > 0 {
        tokio::task::yield_now().await;
    }
    pipeline.reload(vec![("accent_color", SettingValue::from("#222"))]);
    wait_until_idle(&pipeline).await;

    assert_eq!(pipeline.cache_len(), 1);
    assert_eq!(sink.contents(), ".console a { color: #222; }\n");
    assert_eq!(sink.contents(), pipeline.css());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn flush_now_waits_for_a_running_flush() {
    const KEYS: usize = 50_000;
    let sink = MemorySink::new();
    let pipeline = RenderPipeline::builder()
        .registry(wide_registry(KEYS))
        .frames(YieldFrames)
        .build(sink.clone());

    for i in 0..KEYS {
        pipeline.enqueue(format!("w{i}"), 1_i64);
    }
    while pipeline.pending_len() > 0 {
        tokio::task::yield_now().await;
    }
    pipeline.enqueue("w0", 2_i64);
    pipeline.flush_now().unwrap();
    wait_until_idle(&pipeline).await;

    assert_eq!(pipeline.cached("w0").unwrap(), ".p0 { width: 2px; }\n");
    assert_eq!(pipeline.cache_len(), KEYS);
    assert_eq!(sink.contents(), pipeline.css());
}

#[tokio::test(start_paused = true)]
async fn flush_now_reports_sink_failure() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = RenderPipeline::builder()
        .registry(test_registry())
        .build(FileSink::new(dir.path().join("missing").join("theme.css")));

    pipeline.enqueue("color", "#111");
    let err = pipeline.flush_now().unwrap_err();

    assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    assert_eq!(pipeline.stats().flushes, 0);
}

#[tokio::test(start_paused = true)]
async fn scheduled_flush_keeps_sink_failure() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = RenderPipeline::builder()
        .registry(test_registry())
        .build(FileSink::new(dir.path().join("missing").join("theme.css")));

    pipeline.enqueue("color", "#111");
    settle().await;

    let err = pipeline.take_sink_error().expect("write failure recorded");
    assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    assert!(pipeline.take_sink_error().is_none());
    assert!(!pipeline.is_flush_scheduled());
}
