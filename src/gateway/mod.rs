//! Orchestration: backend selection and the analysis entry point

mod analyzer;
mod builder;
pub mod selector;

pub use analyzer::Analyzer;
pub use builder::{AnalyzerBuilder, DEFAULT_TIMEOUT_SECS};
pub use selector::BackendSelector;
