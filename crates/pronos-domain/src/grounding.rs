//! Citations surfaced by the provider's search grounding

use serde::{Deserialize, Serialize};

/// A citation: a URI and an optional title
///
/// Passed through unmodified from the provider's grounding metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroundingSource {
    /// Address of the cited document
    pub uri: String,

    /// Human-readable title, when the provider supplies one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl GroundingSource {
    /// Create a new source
    pub fn new(uri: impl Into<String>, title: Option<String>) -> Self {
        Self {
            uri: uri.into(),
            title,
        }
    }

    /// Title if present, otherwise the URI
    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.uri)
    }
}
