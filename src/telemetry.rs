//! Telemetry metric name constants.
//!
//! Consumers install their own `metrics` recorder (e.g. prometheus, statsd);
//! without a recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `huginn_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `backend`: backend name ("local", "open_backend", "hosted")
//! - `operation`: "summary", "response" or "importance"
//! - `status`: outcome: "ok" or "error"

/// Total remote calls issued by the open and hosted backends.
///
/// Labels: `backend`, `operation`, `status` ("ok" | "error").
pub const REMOTE_REQUESTS_TOTAL: &str = "huginn_remote_requests_total";

/// Remote call duration in seconds.
///
/// Labels: `backend`, `operation`.
pub const REMOTE_REQUEST_DURATION_SECONDS: &str = "huginn_remote_request_duration_seconds";

/// Total analysis cache hits.
///
/// Labels: `operation`.
pub const CACHE_HITS_TOTAL: &str = "huginn_cache_hits_total";

/// Total analysis cache misses (including expired entries).
///
/// Labels: `operation`.
pub const CACHE_MISSES_TOTAL: &str = "huginn_cache_misses_total";

/// Times a caller had to wait because the admission window was full.
pub const ADMISSION_WAITS_TOTAL: &str = "huginn_admission_waits_total";

/// Completed orchestration calls.
///
/// Labels: `backend`, `status`.
pub const ANALYSES_TOTAL: &str = "huginn_analyses_total";
