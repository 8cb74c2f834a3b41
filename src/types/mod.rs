//! Public types for the Huginn API.

mod analysis;
mod config;

pub use analysis::{AnalysisRequest, AnalysisResult, Importance, Operation};
pub use config::{BackendConfig, ProviderKind};
