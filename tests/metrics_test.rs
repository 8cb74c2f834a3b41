//! Tests for metrics integration.
//!
//! Uses `metrics_util::debugging::DebuggingRecorder` to capture and assert
//! on emitted metrics without needing a real exporter.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use metrics_util::MetricKind;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};

use huginn::telemetry;
use huginn::{
    AnalysisRequest, Analyzer, BackendConfig, CompletionClient, CompletionRequest,
    RateLimitConfig, RateLimiter, Result,
};

// ============================================================================
// Mock client
// ============================================================================

struct LowClient;

#[async_trait]
impl CompletionClient for LowClient {
    fn name(&self) -> &str {
        "low"
    }

    async fn complete(&self, _request: &CompletionRequest) -> Result<String> {
        Ok("low".into())
    }
}

// ============================================================================
// Snapshot type alias for readability
// ============================================================================

type SnapshotVec = Vec<(
    metrics_util::CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue,
)>;

// ============================================================================
// Helpers
// ============================================================================

/// Sum all counter values matching a given metric name.
fn counter_total(snapshot: &SnapshotVec, name: &str) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| key.kind() == MetricKind::Counter && key.key().name() == name)
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

/// Check if any histogram entries exist for a given metric name.
fn has_histogram(snapshot: &SnapshotVec, name: &str) -> bool {
    snapshot
        .iter()
        .any(|(key, _, _, _)| key.kind() == MetricKind::Histogram && key.key().name() == name)
}

/// Whether a counter with `name` carries the label `key = value`.
fn has_label(snapshot: &SnapshotVec, name: &str, key: &str, value: &str) -> bool {
    snapshot.iter().any(|(composite, _, _, _)| {
        composite.key().name() == name
            && composite
                .key()
                .labels()
                .any(|label| label.key() == key && label.value() == value)
    })
}

fn request() -> AnalysisRequest {
    AnalysisRequest::new("Status", "Weekly status report attached.")
}

// ============================================================================
// Tests
// ============================================================================

/// Runs async code within a local recorder scope on the multi-thread runtime.
///
/// `block_in_place` keeps the sync `with_local_recorder` closure on the
/// current thread while `block_on` drives the inner async work.
#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn hosted_analysis_records_remote_and_cache_metrics() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let analyzer = Analyzer::builder()
                    .completion_client(Arc::new(LowClient))
                    .build()
                    .await
                    .unwrap();
                let config = BackendConfig::new("openai").credential("sk-test");
                analyzer.analyze(&request(), &config).await.unwrap();
                analyzer.analyze(&request(), &config).await.unwrap();
            })
        })
    });

    let snapshot = snapshotter.snapshot().into_vec();

    assert_eq!(counter_total(&snapshot, telemetry::REMOTE_REQUESTS_TOTAL), 3);
    assert!(has_histogram(
        &snapshot,
        telemetry::REMOTE_REQUEST_DURATION_SECONDS
    ));
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_MISSES_TOTAL), 3);
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_HITS_TOTAL), 3);
    assert_eq!(counter_total(&snapshot, telemetry::ANALYSES_TOTAL), 2);
    assert!(has_label(
        &snapshot,
        telemetry::ANALYSES_TOTAL,
        "backend",
        "hosted"
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn local_analysis_records_no_remote_calls() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let analyzer = Analyzer::builder().build().await.unwrap();
                analyzer
                    .analyze(&request(), &BackendConfig::local())
                    .await
                    .unwrap();
            })
        })
    });

    let snapshot = snapshotter.snapshot().into_vec();

    assert_eq!(counter_total(&snapshot, telemetry::REMOTE_REQUESTS_TOTAL), 0);
    assert_eq!(counter_total(&snapshot, telemetry::ANALYSES_TOTAL), 1);
    assert!(has_label(
        &snapshot,
        telemetry::ANALYSES_TOTAL,
        "status",
        "ok"
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn configuration_failure_records_error() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let analyzer = Analyzer::builder().build().await.unwrap();
                let result = analyzer
                    .analyze(&request(), &BackendConfig::new("openai"))
                    .await;
                assert!(result.is_err());
            })
        })
    });

    let snapshot = snapshotter.snapshot().into_vec();

    assert_eq!(counter_total(&snapshot, telemetry::ANALYSES_TOTAL), 1);
    assert!(has_label(
        &snapshot,
        telemetry::ANALYSES_TOTAL,
        "status",
        "error"
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn full_window_records_admission_wait() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let limiter = RateLimiter::new(
                    RateLimitConfig::new()
                        .max_requests(1)
                        .window(Duration::from_millis(20))
                        .retry_delay(Duration::from_millis(10)),
                );
                limiter.acquire().await;
                limiter.acquire().await;
            })
        })
    });

    let snapshot = snapshotter.snapshot().into_vec();
    assert!(counter_total(&snapshot, telemetry::ADMISSION_WAITS_TOTAL) >= 1);
}

#[tokio::test]
async fn metrics_are_noop_without_recorder() {
    // Verify no panics when no recorder is installed.
    let analyzer = Analyzer::builder()
        .completion_client(Arc::new(LowClient))
        .build()
        .await
        .unwrap();
    let config = BackendConfig::new("openai").credential("sk-test");
    analyzer.analyze(&request(), &config).await.unwrap();
}
