//! JSON recovery from free-text model answers.
//!
//! Direct parsing and the embedded-substring search are separate stages:
//! the first succeeds only on clean output, the second tolerates prose
//! around the payload.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// Greedy match from the first `{` or `[` to the last `}` or `]`.
fn embedded_json_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\{[\s\S]*\}|\[[\s\S]*\])").expect("Invalid regex pattern"))
}

/// Remove leading/trailing markdown code-fence markers and whitespace.
///
/// Handles an opening fence with or without a language tag (```` ```json ````).
pub fn strip_code_fences(text: &str) -> &str {
    let mut cleaned = text.trim();

    if let Some(rest) = cleaned.strip_prefix("```") {
        // Drop the language tag, if any, up to the end of the fence line
        let tag_len = rest
            .find(|c: char| c == '\n' || c == '{' || c == '[')
            .unwrap_or(rest.len());
        let tag = &rest[..tag_len];
        cleaned = if tag.chars().all(|c| c.is_ascii_alphanumeric() || c.is_whitespace()) {
            &rest[tag_len..]
        } else {
            rest
        };
    }

    if let Some(rest) = cleaned.trim_end().strip_suffix("```") {
        cleaned = rest;
    }

    cleaned.trim()
}

/// Parse the whole text as JSON.
pub fn parse_direct(text: &str) -> Option<Value> {
    serde_json::from_str(text).ok()
}

/// Find the first substring that looks like a top-level JSON object or
/// array and parse it.
pub fn find_embedded_json(text: &str) -> Option<Value> {
    let candidate = embedded_json_regex().find(text)?;
    match serde_json::from_str(candidate.as_str()) {
        Ok(value) => Some(value),
        Err(e) => {
            log::debug!("Embedded JSON candidate failed to parse: {}", e);
            None
        }
    }
}

/// Recover a JSON value from arbitrary model output.
///
/// Returns `None` when nothing parses; callers treat that as "no data".
pub fn extract_json(text: &str) -> Option<Value> {
    let cleaned = strip_code_fences(text);

    if let Some(value) = parse_direct(cleaned) {
        return Some(value);
    }

    let recovered = find_embedded_json(cleaned);
    if recovered.is_some() {
        log::debug!("Recovered JSON embedded in surrounding prose");
    } else {
        log::warn!("No JSON found in model answer ({} bytes)", text.len());
    }
    recovered
}
