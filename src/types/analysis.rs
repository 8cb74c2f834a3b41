//! Analysis request and result types

use std::fmt;

use serde::{Deserialize, Serialize};

/// Plain-text email handed to the analyzer.
///
/// Callers are expected to have already extracted subject and body from
/// whatever markup they came in; the body may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub subject: String,
    #[serde(default)]
    pub body: String,
}

impl AnalysisRequest {
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// Importance classification of an email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    High,
    Low,
}

impl Importance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Importance::High => "high",
            Importance::Low => "low",
        }
    }

    /// Parse a backend label strictly.
    ///
    /// The text is trimmed and lower-cased; only `"high"` and `"low"` are
    /// accepted.
    pub fn parse_label(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "high" => Some(Importance::High),
            "low" => Some(Importance::Low),
            _ => None,
        }
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Combined outcome of one orchestration call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub summary: String,
    pub importance: Importance,
    /// `None` when the backend declined to draft a reply, which is
    /// distinct from an empty draft.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_response: Option<String>,
}

/// The three analysis operations, also used as the cache namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Summary,
    Response,
    Importance,
}

impl Operation {
    /// Stable name used in cache keys and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Summary => "summary",
            Operation::Response => "response",
            Operation::Importance => "importance",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
