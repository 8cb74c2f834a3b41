//! Tests for [`HostedBackend`]: cache, admission control and fallbacks
//! around a mock completion client.

use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use huginn::cache::{AnalysisCache, CacheConfig, ManualClock, importance_content};
use huginn::providers::HostedBackend;
use huginn::providers::hosted::{RESPONSE_ERROR, SUMMARY_ERROR};
use huginn::{
    AnalysisError, BackendConfig, CompletionClient, CompletionRequest, Importance, MemoryStore,
    Operation, RateLimitConfig, RateLimiter, Result,
};

/// Mock client that returns a fixed answer (or fails) and records calls.
struct ScriptedClient {
    answer: Option<String>,
    calls: AtomicU32,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedClient {
    fn answering(answer: &str) -> Arc<Self> {
        Arc::new(Self {
            answer: Some(answer.to_string()),
            calls: AtomicU32::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            answer: None,
            calls: AtomicU32::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn call_count(&self) -> u32 {
        self.calls.load(Ordering::Relaxed)
    }

    fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.prompts.lock().unwrap().push(request.prompt.clone());
        match self.answer {
            Some(ref answer) => Ok(answer.clone()),
            None => Err(AnalysisError::Api {
                status: 429,
                message: "rate limited".into(),
            }),
        }
    }
}

struct Harness {
    backend: HostedBackend,
    cache: Arc<AnalysisCache>,
    limiter: Arc<RateLimiter>,
}

async fn harness(client: Arc<ScriptedClient>) -> Harness {
    let cache = Arc::new(
        AnalysisCache::load(
            Arc::new(MemoryStore::new()),
            &CacheConfig::default(),
            Arc::new(ManualClock::new(0)),
        )
        .await,
    );
    let limiter = Arc::new(RateLimiter::new(RateLimitConfig::default()));
    let backend = HostedBackend::with_client(client, cache.clone(), limiter.clone());
    Harness {
        backend,
        cache,
        limiter,
    }
}

// =========================================================================
// Construction
// =========================================================================

#[tokio::test]
async fn new_without_credential_is_configuration_error() {
    let h = harness(ScriptedClient::answering("x")).await;
    let result = HostedBackend::new(
        &BackendConfig::new("openai"),
        h.cache.clone(),
        h.limiter.clone(),
        60,
    );
    let err = result.err().unwrap();
    assert!(err.is_configuration());
}

#[tokio::test]
async fn blank_credential_is_configuration_error() {
    let h = harness(ScriptedClient::answering("x")).await;
    let result = HostedBackend::new(
        &BackendConfig::new("openai").credential("   "),
        h.cache.clone(),
        h.limiter.clone(),
        60,
    );
    assert!(result.is_err());
}

#[tokio::test]
async fn new_with_credential_succeeds() {
    let h = harness(ScriptedClient::answering("x")).await;
    let backend = HostedBackend::new(
        &BackendConfig::new("openai").credential("sk-test"),
        h.cache.clone(),
        h.limiter.clone(),
        60,
    )
    .unwrap();
    assert_eq!(backend.client_name(), "openai");
}

// =========================================================================
// Cache behaviour
// =========================================================================

#[tokio::test]
async fn summary_is_cached_after_first_call() {
    let client = ScriptedClient::answering("  Budget approved.  ");
    let h = harness(client.clone()).await;

    assert_eq!(h.backend.summarize("long email").await, "Budget approved.");
    assert_eq!(h.backend.summarize("long email").await, "Budget approved.");

    assert_eq!(client.call_count(), 1);
    assert_eq!(
        h.cache.get(Operation::Summary, "long email").await.as_deref(),
        Some("Budget approved.")
    );
}

#[tokio::test]
async fn cache_hit_skips_rate_limiter() {
    let client = ScriptedClient::answering("Sure, Tuesday works.");
    let h = harness(client.clone()).await;
    h.cache
        .set(Operation::Response, "Can we meet?", "Cached reply.")
        .await;

    assert_eq!(h.backend.draft_response("Can we meet?").await, "Cached reply.");
    assert_eq!(client.call_count(), 0);
    assert_eq!(h.limiter.in_window(), 0);
}

#[tokio::test]
async fn each_remote_call_takes_a_slot() {
    let client = ScriptedClient::answering("fine");
    let h = harness(client.clone()).await;

    h.backend.summarize("a").await;
    h.backend.draft_response("a").await;
    assert_eq!(h.limiter.in_window(), 2);
}

#[tokio::test]
async fn failure_returns_defaults_and_is_not_cached() {
    let client = ScriptedClient::failing();
    let h = harness(client.clone()).await;

    assert_eq!(h.backend.summarize("body").await, SUMMARY_ERROR);
    assert_eq!(h.backend.draft_response("body").await, RESPONSE_ERROR);
    assert_eq!(
        h.backend.classify_importance("subj", "body").await,
        Importance::Low
    );
    assert!(h.cache.is_empty().await);

    // Nothing cached, so the next call goes out again.
    h.backend.summarize("body").await;
    assert_eq!(client.call_count(), 4);
}

// =========================================================================
// Importance
// =========================================================================

#[tokio::test]
async fn importance_label_is_parsed_and_cached() {
    let client = ScriptedClient::answering(" High\n");
    let h = harness(client.clone()).await;

    assert_eq!(
        h.backend.classify_importance("Outage", "Prod is down").await,
        Importance::High
    );
    assert_eq!(
        h.backend.classify_importance("Outage", "Prod is down").await,
        Importance::High
    );
    assert_eq!(client.call_count(), 1);

    let key = importance_content("Outage", "Prod is down");
    assert_eq!(
        h.cache.get(Operation::Importance, &key).await.as_deref(),
        Some("high")
    );
}

#[tokio::test]
async fn unrecognized_label_is_low_and_not_cached() {
    let client = ScriptedClient::answering("This looks important to me.");
    let h = harness(client.clone()).await;

    assert_eq!(
        h.backend.classify_importance("subj", "body").await,
        Importance::Low
    );
    assert!(h.cache.is_empty().await);

    h.backend.classify_importance("subj", "body").await;
    assert_eq!(client.call_count(), 2);
}

#[tokio::test]
async fn subject_change_misses_importance_cache() {
    let client = ScriptedClient::answering("low");
    let h = harness(client.clone()).await;

    h.backend.classify_importance("Lunch?", "same body").await;
    h.backend.classify_importance("URGENT: Lunch?", "same body").await;
    assert_eq!(client.call_count(), 2);
}

#[tokio::test]
async fn prompts_carry_the_email() {
    let client = ScriptedClient::answering("low");
    let h = harness(client.clone()).await;

    h.backend
        .classify_importance("Invoice overdue", "Please pay by Friday.")
        .await;
    let prompt = client.last_prompt().unwrap();
    assert!(prompt.contains("Invoice overdue"));
    assert!(prompt.contains("Please pay by Friday."));

    h.backend.summarize("Project kickoff notes").await;
    assert!(client.last_prompt().unwrap().contains("Project kickoff notes"));
}
