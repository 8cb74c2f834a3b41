//! Rule-based backend with no I/O.

use crate::types::Importance;

/// Characters kept by [`LocalBackend::summarize`] before truncating.
pub const SUMMARY_CHAR_BUDGET: usize = 100;

/// Appended to a truncated summary.
pub const ELLIPSIS: &str = "...";

/// Substrings that mark an email as important.
pub const URGENCY_KEYWORDS: &[&str] = &[
    "urgent",
    "asap",
    "important",
    "deadline",
    "critical",
    "emergency",
];

/// Canned replies, checked in order against the lower-cased body. The first
/// matching trigger wins; [`GENERIC_REPLY`] applies when none match.
pub const REPLY_RULES: &[(&str, &str)] = &[
    (
        "meeting",
        "Thank you for the meeting request. I will check my calendar and get back to you soon.",
    ),
    (
        "deadline",
        "I acknowledge the deadline and will work on this promptly.",
    ),
];

/// Reply used when no rule in [`REPLY_RULES`] matches.
pub const GENERIC_REPLY: &str = "Thank you for your email. I will review and respond soon.";

/// Keyword-driven analysis that runs entirely in-process.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalBackend;

impl LocalBackend {
    pub fn new() -> Self {
        Self
    }

    /// First [`SUMMARY_CHAR_BUDGET`] characters plus an ellipsis, or the
    /// content unchanged if it already fits.
    pub fn summarize(&self, content: &str) -> String {
        match content.char_indices().nth(SUMMARY_CHAR_BUDGET) {
            Some((cut, _)) => format!("{}{ELLIPSIS}", &content[..cut]),
            None => content.to_string(),
        }
    }

    /// High if any urgency keyword appears in the subject or the body.
    pub fn classify_importance(&self, subject: &str, content: &str) -> Importance {
        let text = format!("{subject} {content}").to_lowercase();
        if URGENCY_KEYWORDS.iter().any(|keyword| text.contains(keyword)) {
            Importance::High
        } else {
            Importance::Low
        }
    }

    pub fn draft_response(&self, content: &str) -> String {
        let text = content.to_lowercase();
        REPLY_RULES
            .iter()
            .find(|(trigger, _)| text.contains(trigger))
            .map_or(GENERIC_REPLY, |(_, reply)| *reply)
            .to_string()
    }
}
