//! Turns raw model text into the shapes the session expects.

use std::sync::LazyLock;

use animicon_core::generation::GenerationError;
use regex::Regex;

/// Markdown code fence around a reply, e.g. ```json ... ```
static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*```[a-zA-Z]*\s*\n?(.*?)\n?\s*```\s*$").expect("valid fence regex")
});

/// First complete <svg ...>...</svg> element, case-insensitive.
static SVG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<svg\b.*?</svg\s*>").expect("valid svg regex"));

fn strip_code_fence(text: &str) -> &str {
    FENCE_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(text)
        .trim()
}

/// Parses a JSON array of animation ideas.
///
/// Blank entries are dropped and surrounding whitespace is trimmed. An empty
/// array is a valid answer.
pub fn parse_suggestions(text: &str) -> Result<Vec<String>, GenerationError> {
    let body = strip_code_fence(text);
    let raw: Vec<String> = serde_json::from_str(body).map_err(|err| {
        GenerationError::malformed(format!("expected a JSON array of strings: {err}"))
    })?;

    Ok(raw
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

/// Extracts the SVG element from a reply that may carry prose or fences.
pub fn extract_svg(text: &str) -> Result<String, GenerationError> {
    SVG_RE
        .find(text)
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| GenerationError::malformed("no <svg> element in response"))
}
