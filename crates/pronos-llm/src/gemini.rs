//! Gemini Provider Implementation
//!
//! Integration with Google's Generative Language API (`generateContent`).
//!
//! # Features
//!
//! - Async HTTP communication with the Gemini API
//! - Optional structured output via a JSON response schema
//! - Optional Google Search grounding (citations surface as grounding chunks)
//! - Retry logic with exponential backoff for transport and 5xx failures
//!
//! # Examples
//!
//! ```no_run
//! use pronos_llm::{resolve_credential, GeminiProvider, CREDENTIAL_VARS};
//!
//! # fn example() -> Result<(), pronos_llm::LlmError> {
//! let key = resolve_credential(CREDENTIAL_VARS)?;
//! let provider = GeminiProvider::new(key, "gemini-2.5-flash")?;
//! # Ok(())
//! # }
//! ```

use crate::LlmError;
use async_trait::async_trait;
use pronos_domain::{Completion, GroundingChunk, TextCompletionService};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default Generative Language API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Default model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default timeout for completion requests (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default number of attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Gemini API provider
pub struct GeminiProvider {
    endpoint: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
    max_retries: u32,
    search_grounding: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a serde_json::Value,
}

#[derive(Deserialize, Default)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Deserialize, Default)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize, Default)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

impl GeminiProvider {
    /// Create a new Gemini provider
    ///
    /// # Parameters
    ///
    /// - `api_key`: Credential resolved at startup
    /// - `model`: Model to use (e.g., "gemini-2.5-flash")
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: model.into(),
            api_key: api_key.into(),
            client,
            max_retries: DEFAULT_MAX_RETRIES,
            search_grounding: true,
        })
    }

    /// Point the provider at a different API host
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the maximum number of attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Enable or disable Google Search grounding for free-form requests
    pub fn with_search_grounding(mut self, enabled: bool) -> Self {
        self.search_grounding = enabled;
        self
    }

    fn url(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.endpoint, self.model)
    }

    fn build_request<'a>(
        &self,
        prompt: &'a str,
        schema: Option<&'a serde_json::Value>,
    ) -> GenerateRequest<'a> {
        // The API rejects a response schema combined with the search tool.
        let tools = match schema {
            None if self.search_grounding => vec![serde_json::json!({ "google_search": {} })],
            _ => Vec::new(),
        };

        GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            tools,
            generation_config: schema.map(|response_schema| GenerationConfig {
                response_mime_type: "application/json",
                response_schema,
            }),
        }
    }

    /// Generate a completion using the Gemini API
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The credential is rejected
    /// - The model is not available
    /// - Network communication fails after all attempts
    /// - Response format is invalid
    pub async fn generate(
        &self,
        prompt: &str,
        schema: Option<&serde_json::Value>,
    ) -> Result<Completion, LlmError> {
        let url = self.url();
        let request_body = self.build_request(prompt, schema);

        // Retry logic with exponential backoff
        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .json(&request_body)
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let body = response.json::<GenerateResponse>().await.map_err(|e| {
                            LlmError::InvalidResponse(format!("Failed to parse response: {}", e))
                        })?;
                        return Ok(into_completion(body));
                    }

                    let error_text = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    match classify_status(status, &self.model, &error_text) {
                        StatusOutcome::Fatal(error) => return Err(error),
                        StatusOutcome::Retryable(error) => last_error = Some(error),
                    }
                }
                Err(e) => {
                    last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                // Exponential backoff: 1s, 2s, 4s, etc.
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                warn!(attempt = attempts, ?delay, "Gemini request failed, retrying");
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
    }
}

/// What to do with a non-success HTTP status
#[derive(Debug)]
enum StatusOutcome {
    /// Give up immediately
    Fatal(LlmError),
    /// Try again after backoff
    Retryable(LlmError),
}

fn classify_status(status: reqwest::StatusCode, model: &str, body: &str) -> StatusOutcome {
    match status {
        reqwest::StatusCode::NOT_FOUND => {
            StatusOutcome::Fatal(LlmError::ModelNotAvailable(model.to_string()))
        }
        reqwest::StatusCode::TOO_MANY_REQUESTS => StatusOutcome::Fatal(LlmError::RateLimitExceeded),
        reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => StatusOutcome::Fatal(
            LlmError::Communication(format!("HTTP {}: credential rejected", status)),
        ),
        _ => {
            let error = LlmError::Communication(format!("HTTP {}: {}", status, body));
            if status.is_client_error() {
                StatusOutcome::Fatal(error)
            } else {
                StatusOutcome::Retryable(error)
            }
        }
    }
}

fn into_completion(body: GenerateResponse) -> Completion {
    let Some(candidate) = body.candidates.into_iter().next() else {
        debug!("Gemini returned no candidates");
        return Completion::default();
    };

    let text = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .unwrap_or_default();

    let grounding_chunks = candidate
        .grounding_metadata
        .map(|metadata| metadata.grounding_chunks)
        .unwrap_or_default();

    Completion {
        text,
        grounding_chunks,
    }
}

#[async_trait]
impl TextCompletionService for GeminiProvider {
    type Error = LlmError;

    async fn complete(
        &self,
        prompt: &str,
        schema: Option<&serde_json::Value>,
    ) -> Result<Completion, Self::Error> {
        self.generate(prompt, schema).await
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
