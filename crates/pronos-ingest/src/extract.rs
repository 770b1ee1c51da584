//! Locate the JSON object inside a raw model response
//!
//! Models wrap JSON in markdown fences, prose, or both. Extraction is purely
//! textual: nothing is parsed here, so commentary around a valid object never
//! causes a rejection at this stage.

use crate::error::IngestError;
use regex::Regex;
use std::sync::LazyLock;

static JSON_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```json(.*?)```").expect("valid fence regex"));

/// A substring believed to contain the structured answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPayload(String);

impl ExtractedPayload {
    /// Wrap text that is already known to be the payload
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The payload text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take ownership of the payload text
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Extract the JSON payload from `raw`
///
/// A fenced ```` ```json ```` block wins over brace scanning so that stray
/// braces in trailing prose cannot widen the span.
pub fn extract(raw: &str) -> Result<ExtractedPayload, IngestError> {
    if let Some(interior) = JSON_FENCE.captures(raw).and_then(|c| c.get(1)) {
        return Ok(ExtractedPayload::new(interior.as_str()));
    }

    let start = raw.find('{');
    let end = raw.rfind('}');
    match (start, end) {
        (Some(start), Some(end)) if start < end => Ok(ExtractedPayload::new(&raw[start..=end])),
        _ => Err(IngestError::NoJsonFound),
    }
}
