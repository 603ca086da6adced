//! Extraction of structured data from free-form model replies.
//!
//! Models are prompted to wrap their JSON in a fenced code block, but the
//! surrounding prose varies wildly. The parser scans for fenced blocks,
//! takes the first one that looks like a JSON array, and tolerates stray
//! non-string elements by dropping them with a warning.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("response contains no fenced JSON array")]
    NoStructuredBlock,
    #[error("fenced block is not valid JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),
}

fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"```(?:json)?\s*([\s\S]*?)```").expect("fence pattern is valid")
    })
}

/// Pulls the first fenced JSON array out of `response` and returns its
/// string elements in order. Non-string elements are skipped, not fatal.
pub fn extract_string_array(response: &str) -> Result<Vec<String>, ParseError> {
    let block = fence_regex()
        .captures_iter(response)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().trim()))
        .find(|body| body.starts_with('['))
        .ok_or(ParseError::NoStructuredBlock)?;

    let values: Vec<Value> = serde_json::from_str(block)?;

    let mut strings = Vec::with_capacity(values.len());
    for value in values {
        match value {
            Value::String(s) => strings.push(s),
            other => {
                warn!(element = %other, "skipping non-string element in model response");
            }
        }
    }
    Ok(strings)
}
