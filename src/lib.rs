//! Huginn - email analysis orchestration
//!
//! For each email (subject + body) huginn produces a short summary, an
//! importance classification and a suggested reply, using one of three
//! interchangeable backends chosen per call:
//!
//! - `local`: keyword rules, no network
//! - `opensource`: a self-hosted model behind an HTTP generate endpoint
//! - `openai`: a hosted chat-completion service, cached and rate limited
//!
//! # Example
//!
//! ```rust,no_run
//! use huginn::{Analyzer, CacheConfig, RateLimitConfig};
//! use huginn::types::{AnalysisRequest, BackendConfig};
//!
//! #[tokio::main]
//! async fn main() -> huginn::Result<()> {
//!     let analyzer = Analyzer::builder()
//!         .store_path("/tmp/huginn/store.json")
//!         .cache_config(CacheConfig::default())
//!         .rate_limit(RateLimitConfig::default())
//!         .build()
//!         .await?;
//!
//!     let request = AnalysisRequest::new("Team Sync", "Let's meet about the project deadline");
//!     let result = analyzer.analyze(&request, &BackendConfig::local()).await?;
//!
//!     println!("{} [{}]", result.summary, result.importance);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod error;
pub mod gateway;
pub mod providers;
pub mod settings;
pub mod store;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use cache::{AnalysisCache, CacheConfig};
pub use error::{AnalysisError, Result};
pub use gateway::{Analyzer, AnalyzerBuilder, BackendSelector};
pub use providers::{Backend, CompletionClient, CompletionRequest, RateLimitConfig, RateLimiter};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
pub use types::{
    AnalysisRequest, AnalysisResult, BackendConfig, Importance, Operation, ProviderKind,
};

/// Crate version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");
