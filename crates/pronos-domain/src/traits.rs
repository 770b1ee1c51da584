//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Raw output of one text-completion call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Completion {
    /// Unstructured text returned by the model
    pub text: String,

    /// Search-grounding metadata, if the provider attached any
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

impl Completion {
    /// Completion with text only
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            grounding_chunks: Vec::new(),
        }
    }
}

/// One grounding chunk as reported by the provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroundingChunk {
    /// Web citation, absent for non-web chunks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web: Option<WebChunk>,
}

/// Web citation carried by a grounding chunk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebChunk {
    /// Cited URI
    #[serde(default)]
    pub uri: String,

    /// Page title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Trait for text-completion providers
///
/// Implemented by the infrastructure layer (pronos-llm). The pipeline only
/// consumes the returned text and grounding metadata; transport and
/// credentials are the implementor's concern.
#[async_trait]
pub trait TextCompletionService: Send + Sync {
    /// Error type for completion calls
    type Error: Send;

    /// Complete a prompt, optionally constraining output to a JSON schema
    async fn complete(
        &self,
        prompt: &str,
        schema: Option<&serde_json::Value>,
    ) -> Result<Completion, Self::Error>;

    /// Name of the model behind this service
    fn model_name(&self) -> &str {
        "llm"
    }
}

/// Trait for the opaque key-value cache callers persist results into
///
/// Last writer wins; no transactional guarantee is provided.
pub trait KeyValueCache {
    /// Error type for cache operations
    type Error;

    /// Read a value
    fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Write a value, replacing any previous one
    fn set(&mut self, key: &str, value: &str) -> Result<(), Self::Error>;

    /// Remove a value; removing a missing key is not an error
    fn remove(&mut self, key: &str) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grounding_chunk_provider_shape() {
        let json = r#"[
            {"web": {"uri": "https://www.lequipe.fr/a", "title": "L'Equipe"}},
            {"retrievedContext": {"uri": "x"}}
        ]"#;
        let chunks: Vec<GroundingChunk> = serde_json::from_str(json).unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].web.as_ref().unwrap().uri, "https://www.lequipe.fr/a");
        assert!(chunks[1].web.is_none());
    }

    struct Echo;

    #[async_trait]
    impl TextCompletionService for Echo {
        type Error = String;

        async fn complete(
            &self,
            prompt: &str,
            _schema: Option<&serde_json::Value>,
        ) -> Result<Completion, Self::Error> {
            Ok(Completion::text(prompt))
        }
    }

    #[tokio::test]
    async fn test_default_model_name() {
        let echo = Echo;
        assert_eq!(echo.model_name(), "llm");
        assert_eq!(echo.complete("hi", None).await.unwrap().text, "hi");
    }
}
