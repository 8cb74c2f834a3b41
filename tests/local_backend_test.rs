//! Tests for the rule-based [`LocalBackend`].

use huginn::Importance;
use huginn::providers::LocalBackend;
use huginn::providers::local::{ELLIPSIS, GENERIC_REPLY, SUMMARY_CHAR_BUDGET};

const MEETING_REPLY: &str =
    "Thank you for the meeting request. I will check my calendar and get back to you soon.";
const DEADLINE_REPLY: &str = "I acknowledge the deadline and will work on this promptly.";

// =========================================================================
// summarize
// =========================================================================

#[test]
fn short_content_is_returned_unchanged() {
    let backend = LocalBackend::new();
    assert_eq!(backend.summarize("Lunch on Friday?"), "Lunch on Friday?");
    assert_eq!(backend.summarize(""), "");
}

#[test]
fn content_at_budget_is_not_truncated() {
    let content = "a".repeat(SUMMARY_CHAR_BUDGET);
    assert_eq!(LocalBackend::new().summarize(&content), content);
}

#[test]
fn long_content_is_truncated_with_ellipsis() {
    let backend = LocalBackend::new();
    for len in [SUMMARY_CHAR_BUDGET + 1, 150, 1_000] {
        let content: String = ('a'..='z').cycle().take(len).collect();
        let summary = backend.summarize(&content);

        assert!(summary.ends_with(ELLIPSIS));
        assert_eq!(
            summary.chars().count(),
            SUMMARY_CHAR_BUDGET + ELLIPSIS.chars().count()
        );
        assert!(content.starts_with(summary.trim_end_matches(ELLIPSIS)));
    }
}

#[test]
fn truncation_respects_multibyte_characters() {
    let content = "é".repeat(120);
    let summary = LocalBackend::new().summarize(&content);
    assert_eq!(summary, format!("{}{ELLIPSIS}", "é".repeat(100)));
}

// =========================================================================
// classify_importance
// =========================================================================

#[test]
fn keyword_in_subject_is_high() {
    let backend = LocalBackend::new();
    assert_eq!(
        backend.classify_importance("Re: deadline tomorrow", "ok"),
        Importance::High
    );
}

#[test]
fn keyword_in_body_is_high() {
    let backend = LocalBackend::new();
    assert_eq!(
        backend.classify_importance("hello", "This is CRITICAL, please look"),
        Importance::High
    );
}

#[test]
fn every_urgency_keyword_triggers() {
    let backend = LocalBackend::new();
    for keyword in ["urgent", "ASAP", "Important", "deadline", "critical", "Emergency"] {
        assert_eq!(
            backend.classify_importance("", keyword),
            Importance::High,
            "keyword {keyword:?}"
        );
    }
}

#[test]
fn no_keyword_is_low() {
    let backend = LocalBackend::new();
    assert_eq!(
        backend.classify_importance("Weekly newsletter", "Here are this week's links."),
        Importance::Low
    );
    assert_eq!(backend.classify_importance("", ""), Importance::Low);
}

// =========================================================================
// draft_response
// =========================================================================

#[test]
fn meeting_body_gets_meeting_reply() {
    let reply = LocalBackend::new().draft_response("Can we set up a Meeting next week?");
    assert_eq!(reply, MEETING_REPLY);
}

#[test]
fn deadline_body_gets_deadline_reply() {
    let reply = LocalBackend::new().draft_response("The deadline moved to Monday.");
    assert_eq!(reply, DEADLINE_REPLY);
}

#[test]
fn meeting_takes_precedence_over_deadline() {
    let reply = LocalBackend::new().draft_response("meeting about the deadline");
    assert_eq!(reply, MEETING_REPLY);
}

#[test]
fn meet_is_not_meeting() {
    let reply = LocalBackend::new().draft_response("Let's meet about the project deadline");
    assert_eq!(reply, DEADLINE_REPLY);
}

#[test]
fn unmatched_body_gets_generic_reply() {
    let backend = LocalBackend::new();
    assert_eq!(backend.draft_response("Thanks for the update."), GENERIC_REPLY);
    assert_eq!(backend.draft_response(""), GENERIC_REPLY);
}
