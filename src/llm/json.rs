//! JSON extraction for completion text.
//!
//! Completion models often wrap the payload in markdown fences, prefix it
//! with "Output:" or "Response:", or surround it with prose. This module
//! recovers the JSON object so that only genuinely malformed text is
//! treated as a failed attempt.

use std::sync::LazyLock;

use regex_lite::Regex;

static BOILERPLATE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:output|response)\s*:\s*").expect("boilerplate prefix regex is valid")
});

/// Strip leading "Output:" / "Response:" labels (case-insensitive, repeated).
pub fn strip_boilerplate(text: &str) -> &str {
    let mut rest = text.trim();
    while let Some(found) = BOILERPLATE_PREFIX.find(rest) {
        rest = rest[found.end()..].trim_start();
    }
    rest
}

/// Clean a raw completion and extract the JSON object it carries.
pub fn clean_completion(text: &str) -> String {
    extract_json(strip_boilerplate(text))
}

/// Extract a JSON object from a response that may be wrapped in markdown.
///
/// Tries, in order:
/// 1. Markdown ` ```json ... ``` ` fenced block
/// 2. Bare ` ``` ... ``` ` fenced block (if the content starts with `{`)
/// 3. Balanced-brace extraction from surrounding text
/// 4. Returns the input unchanged as a last resort
pub fn extract_json(response: &str) -> String {
    let trimmed = response.trim();

    if let Some(start) = trimmed.find("```json")
        && let Some(end) = trimmed[start + 7..].find("```")
    {
        return trimmed[start + 7..start + 7 + end].trim().to_string();
    }

    if let Some(start) = trimmed.find("```")
        && let Some(end) = trimmed[start + 3..].find("```")
    {
        let inner = trimmed[start + 3..start + 3 + end].trim();
        if inner.starts_with('{') {
            return inner.to_string();
        }
    }

    if let Some(json_str) = find_valid_json_object(trimmed) {
        return json_str;
    }

    trimmed.to_string()
}

/// Find the first `{` that starts a parseable JSON object.
fn find_valid_json_object(text: &str) -> Option<String> {
    for (start_idx, _) in text.match_indices('{') {
        let candidate = &text[start_idx..];

        // A stream deserializer stops at the end of the first value, so
        // trailing prose does not spoil an otherwise valid object.
        let mut stream = serde_json::Deserializer::from_str(candidate).into_iter::<serde_json::Value>();
        if let Some(Ok(value)) = stream.next()
            && value.is_object()
        {
            return Some(candidate[..stream.byte_offset()].to_string());
        }
    }

    None
}
