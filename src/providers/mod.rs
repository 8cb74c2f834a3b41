//! Analysis backends and the admission controller in front of them.
//!
//! [`Backend`] is a closed enum over three variants:
//!
//! - [`LocalBackend`]: keyword rules, no I/O
//! - [`OpenBackend`]: self-hosted model over HTTP, defaults on failure
//! - [`HostedBackend`]: chat completions through [`CompletionClient`],
//!   cached in [`AnalysisCache`](crate::cache::AnalysisCache) and gated by
//!   [`RateLimiter`]

pub mod backend;
pub mod hosted;
pub mod llm_chat;
pub mod local;
pub mod open;
pub mod rate_limit;
pub mod traits;

pub use backend::Backend;
pub use hosted::HostedBackend;
pub use llm_chat::LlmCompletionClient;
pub use local::LocalBackend;
pub use open::OpenBackend;
pub use rate_limit::{RateLimitConfig, RateLimiter};
pub use traits::{CompletionClient, CompletionRequest};

use std::time::Duration;

use crate::telemetry;
use crate::types::Operation;

/// Emit request count and latency for one remote call.
pub(crate) fn record_remote_call(
    backend: &'static str,
    operation: Operation,
    ok: bool,
    elapsed: Duration,
) {
    let status = if ok { "ok" } else { "error" };
    metrics::counter!(telemetry::REMOTE_REQUESTS_TOTAL,
        "backend" => backend,
        "operation" => operation.as_str(),
        "status" => status,
    )
    .increment(1);
    metrics::histogram!(telemetry::REMOTE_REQUEST_DURATION_SECONDS,
        "backend" => backend,
        "operation" => operation.as_str(),
    )
    .record(elapsed.as_secs_f64());
}
