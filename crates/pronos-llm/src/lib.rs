//! Pronos AI Provider Layer
//!
//! Implementations of the `TextCompletionService` trait from `pronos-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `GeminiProvider`: Google Generative Language API with optional search grounding
//!
//! Credentials are resolved once at startup with [`resolve_credential`] and
//! handed to the provider explicitly; providers never read the environment.
//!
//! # Examples
//!
//! ```
//! use pronos_llm::MockProvider;
//! use pronos_domain::TextCompletionService;
//!
//! # async fn example() {
//! let provider = MockProvider::new(r#"{"predictions": []}"#);
//! let completion = provider.complete("test prompt", None).await.unwrap();
//! assert_eq!(completion.text, r#"{"predictions": []}"#);
//! # }
//! ```

#![warn(missing_docs)]

pub mod gemini;

use async_trait::async_trait;
use pronos_domain::{Completion, GroundingChunk, TextCompletionService};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

pub use gemini::GeminiProvider;

/// Environment variables checked for the provider credential, in order
pub const CREDENTIAL_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

/// Errors that can occur during provider operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// No credential available to reach the provider
    #[error("Missing credential: none of {0} is set")]
    MissingCredential(String),

    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Provider answered with something other than a completion
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Resolve the provider credential from the process environment
///
/// Returns the first non-empty value among `var_names`.
pub fn resolve_credential(var_names: &[&str]) -> Result<String, LlmError> {
    resolve_credential_with(var_names, |name| std::env::var(name).ok())
}

/// Resolve the credential through an arbitrary lookup
pub fn resolve_credential_with<F>(var_names: &[&str], lookup: F) -> Result<String, LlmError>
where
    F: Fn(&str) -> Option<String>,
{
    var_names
        .iter()
        .filter_map(|name| lookup(name))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .ok_or_else(|| LlmError::MissingCredential(var_names.join(", ")))
}

#[derive(Debug, Clone)]
enum Scripted {
    Reply(String),
    Fail(String),
}

#[derive(Debug, Default)]
struct MockState {
    scripted: Vec<(String, Scripted)>,
    call_count: usize,
    last_prompt: Option<String>,
    last_schema: Option<serde_json::Value>,
}

/// Mock provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls.
/// Scripted responses match when the prompt contains the registered fragment;
/// the first match wins.
///
/// # Examples
///
/// ```
/// use pronos_llm::MockProvider;
/// use pronos_domain::TextCompletionService;
///
/// # async fn example() {
/// let mut provider = MockProvider::default();
/// provider.add_response("Lakers", r#"{"error": "Aucun match"}"#);
/// let reply = provider.complete("Analyse Lakers vs Celtics", None).await.unwrap();
/// assert!(reply.text.contains("Aucun match"));
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    grounding: Vec<GroundingChunk>,
    state: Arc<Mutex<MockState>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            grounding: Vec::new(),
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Attach grounding chunks to every completion
    pub fn with_grounding(mut self, chunks: Vec<GroundingChunk>) -> Self {
        self.grounding = chunks;
        self
    }

    /// Add a specific response for prompts containing `fragment`
    pub fn add_response(&mut self, fragment: impl Into<String>, response: impl Into<String>) {
        self.lock()
            .scripted
            .push((fragment.into(), Scripted::Reply(response.into())));
    }

    /// Configure to fail for prompts containing `fragment`
    pub fn add_error(&mut self, fragment: impl Into<String>) {
        self.lock()
            .scripted
            .push((fragment.into(), Scripted::Fail("Mock error".to_string())));
    }

    /// Get the number of times complete was called
    pub fn call_count(&self) -> usize {
        self.lock().call_count
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        self.lock().call_count = 0;
    }

    /// Prompt of the most recent call
    pub fn last_prompt(&self) -> Option<String> {
        self.lock().last_prompt.clone()
    }

    /// Schema of the most recent call
    pub fn last_schema(&self) -> Option<serde_json::Value> {
        self.lock().last_schema.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

#[async_trait]
impl TextCompletionService for MockProvider {
    type Error = LlmError;

    async fn complete(
        &self,
        prompt: &str,
        schema: Option<&serde_json::Value>,
    ) -> Result<Completion, Self::Error> {
        let scripted = {
            let mut state = self.lock();
            state.call_count += 1;
            state.last_prompt = Some(prompt.to_string());
            state.last_schema = schema.cloned();
            state
                .scripted
                .iter()
                .find(|(fragment, _)| prompt.contains(fragment.as_str()))
                .map(|(_, scripted)| scripted.clone())
        };

        let text = match scripted {
            Some(Scripted::Fail(reason)) => return Err(LlmError::Other(reason)),
            Some(Scripted::Reply(text)) => text,
            None => self.default_response.clone(),
        };

        Ok(Completion {
            text,
            grounding_chunks: self.grounding.clone(),
        })
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pronos_domain::WebChunk;
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        let result = provider.complete("any prompt", None).await;
        assert!(result.is_ok());
        assert_eq!(result.unwrap().text, "Test response");
    }

    #[tokio::test]
    async fn test_mock_provider_specific_responses() {
        let mut provider = MockProvider::default();
        provider.add_response("hello", "world");
        provider.add_response("foo", "bar");

        assert_eq!(provider.complete("say hello", None).await.unwrap().text, "world");
        assert_eq!(provider.complete("foo?", None).await.unwrap().text, "bar");
        assert_eq!(
            provider.complete("unknown", None).await.unwrap().text,
            "Default mock response"
        );
    }

    #[tokio::test]
    async fn test_mock_provider_call_count() {
        let provider = MockProvider::new("test");

        assert_eq!(provider.call_count(), 0);

        provider.complete("prompt1", None).await.unwrap();
        assert_eq!(provider.call_count(), 1);

        provider.complete("prompt2", None).await.unwrap();
        assert_eq!(provider.call_count(), 2);

        provider.reset_call_count();
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_provider_error() {
        let mut provider = MockProvider::default();
        provider.add_error("bad prompt");

        let result = provider.complete("a bad prompt", None).await;
        assert!(matches!(result.unwrap_err(), LlmError::Other(_)));
    }

    #[tokio::test]
    async fn test_mock_provider_records_schema() {
        let provider = MockProvider::new("{}");
        let schema = serde_json::json!({"type": "object"});
        provider.complete("prompt", Some(&schema)).await.unwrap();

        assert_eq!(provider.last_prompt().as_deref(), Some("prompt"));
        assert_eq!(provider.last_schema(), Some(schema));
    }

    #[tokio::test]
    async fn test_mock_provider_grounding() {
        let provider = MockProvider::new("{}").with_grounding(vec![GroundingChunk {
            web: Some(WebChunk {
                uri: "https://example.com".to_string(),
                title: None,
            }),
        }]);
        let completion = provider.complete("prompt", None).await.unwrap();
        assert_eq!(completion.grounding_chunks.len(), 1);
    }

    #[tokio::test]
    async fn test_mock_provider_clone() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider1.complete("test", None).await.unwrap();

        // Both should share the same call count due to Arc
        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }

    #[test]
    fn test_resolve_credential_first_non_empty() {
        let env: HashMap<&str, &str> = [("GEMINI_API_KEY", "  "), ("API_KEY", "secret")].into();
        let key = resolve_credential_with(CREDENTIAL_VARS, |name| {
            env.get(name).map(|v| v.to_string())
        })
        .unwrap();
        assert_eq!(key, "secret");
    }

    #[test]
    fn test_resolve_credential_missing() {
        let result = resolve_credential_with(CREDENTIAL_VARS, |_| None);
        match result {
            Err(LlmError::MissingCredential(vars)) => {
                assert!(vars.contains("GEMINI_API_KEY"));
                assert!(vars.contains("API_KEY"));
            }
            other => panic!("Expected MissingCredential, got {:?}", other),
        }
    }
}
