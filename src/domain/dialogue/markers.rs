//! Ask-body marker handling.
//!
//! The patient signals a sub-query to its own body with an in-band marker:
//!
//! - current syntax: `[询问身体:我的头痛是什么感觉？]` (full-width brackets and colon accepted)
//! - legacy syntax: `[询问身体]: 我的头痛是什么感觉？` (the query runs to end of line)
//!
//! Markers are routing instructions, never dialogue. Everything the doctor
//! sees passes through [`strip_markers`].

use once_cell::sync::Lazy;
use regex::Regex;

/// Query the body oracle answers when no usable payload can be extracted.
pub const DEFAULT_BODY_QUERY: &str = "我的症状是什么？";

static PRIMARY_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\[【]\s*询问身体\s*[:：]\s*([^\]】]*?)\s*[\]】]").expect("valid primary marker regex")
});

static LEGACY_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\[【]\s*询问身体\s*[\]】]\s*[:：]?\s*([^\n]*)").expect("valid legacy marker regex")
});

// Opening bracket with no matching close, e.g. a truncated generation.
static UNCLOSED_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\[【]\s*询问身体[^\n]*").expect("valid unclosed marker regex"));

/// Returns the trimmed payload of the first well-formed marker, if non-empty.
pub fn primary_payload(text: &str) -> Option<String> {
    PRIMARY_MARKER
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|payload| !payload.is_empty())
}

fn legacy_payload(text: &str) -> Option<String> {
    LEGACY_MARKER
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|payload| !payload.is_empty())
}

/// Returns true if the text asks the body something and should route to `BodyTurn`.
pub fn requests_body(text: &str) -> bool {
    primary_payload(text).is_some()
}

/// Extracts the body query: primary syntax, then legacy, then [`DEFAULT_BODY_QUERY`].
pub fn extract_body_query(text: &str) -> String {
    primary_payload(text)
        .or_else(|| legacy_payload(text))
        .unwrap_or_else(|| DEFAULT_BODY_QUERY.to_string())
}

/// Returns true if any marker remnant (closed or not) is present.
pub fn contains_marker(text: &str) -> bool {
    UNCLOSED_MARKER.is_match(text)
}

/// Removes every marker form and trims the result.
///
/// Idempotent: `strip_markers(&strip_markers(s)) == strip_markers(s)`.
pub fn strip_markers(text: &str) -> String {
    let mut current = text.to_string();
    // Every pass either removes a non-empty match or stops, so this terminates.
    loop {
        let next = PRIMARY_MARKER.replace_all(&current, "");
        let next = LEGACY_MARKER.replace_all(&next, "");
        let next = UNCLOSED_MARKER.replace_all(&next, "").into_owned();
        if next == current {
            break;
        }
        current = next;
    }
    current.trim().to_string()
}
