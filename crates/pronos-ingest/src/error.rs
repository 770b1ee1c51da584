//! Error types for the ingestion pipeline

use pronos_llm::LlmError;
use thiserror::Error;

/// Longest excerpt of offending text carried by a diagnostic
pub const MAX_EXCERPT_CHARS: usize = 200;

/// Errors that can occur while turning a model response into records
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IngestError {
    /// Raw text contained no locatable JSON object
    #[error("No JSON object found in model response")]
    NoJsonFound,

    /// A JSON-like substring was found but failed to parse
    #[error("Malformed JSON ({reason}): {excerpt}")]
    MalformedJson {
        /// Bounded excerpt of the offending text
        excerpt: String,
        /// Parser diagnostic
        reason: String,
    },

    /// Parsed JSON lacks required keys or has the wrong types
    #[error("Unexpected payload shape: {0}")]
    UnexpectedShape(String),

    /// The provider explicitly reported it could not answer
    #[error("Provider reported: {0}")]
    UpstreamReported(String),

    /// The credential needed to reach the provider is absent
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// The completion call itself failed
    #[error("Provider error: {0}")]
    Provider(String),

    /// The request parameters were rejected before calling the provider
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse classification handed to callers for presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// See [`IngestError::NoJsonFound`]
    NoJsonFound,
    /// See [`IngestError::MalformedJson`]
    MalformedJson,
    /// See [`IngestError::UnexpectedShape`]
    UnexpectedShape,
    /// See [`IngestError::UpstreamReported`]
    UpstreamReported,
    /// See [`IngestError::MissingCredential`]
    MissingCredential,
    /// See [`IngestError::Provider`]
    Provider,
    /// See [`IngestError::InvalidRequest`]
    InvalidRequest,
    /// See [`IngestError::Config`]
    Config,
}

/// Pipeline stage an error is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Before or during the completion call
    Requesting,
    /// Locating the JSON payload in the raw text
    Extracting,
    /// Parsing and shape-checking the payload
    Validating,
}

/// Message shown when the engine produced nothing usable
pub const ENGINE_FAILURE_MESSAGE: &str =
    "Le moteur d'analyse n'a pas pu fournir de réponse exploitable. Réessayez dans un instant.";

/// Message shown when the provider found no qualifying match
pub const NO_MATCH_MESSAGE: &str =
    "Aucun match correspondant n'a été trouvé pour le moment.";

/// Message shown when the request itself was incomplete
pub const INVALID_REQUEST_MESSAGE: &str =
    "La demande est incomplète : précisez le sport, les deux équipes et le pari.";

/// Message shown for configuration problems
pub const CONFIGURATION_MESSAGE: &str =
    "Le service d'analyse n'est pas configuré (clé API manquante ou invalide).";

impl IngestError {
    /// Build a malformed-JSON error with a bounded excerpt
    pub fn malformed(text: &str, reason: impl Into<String>) -> Self {
        IngestError::MalformedJson {
            excerpt: excerpt(text, MAX_EXCERPT_CHARS),
            reason: reason.into(),
        }
    }

    /// Classification of this error
    pub fn kind(&self) -> FailureKind {
        match self {
            IngestError::NoJsonFound => FailureKind::NoJsonFound,
            IngestError::MalformedJson { .. } => FailureKind::MalformedJson,
            IngestError::UnexpectedShape(_) => FailureKind::UnexpectedShape,
            IngestError::UpstreamReported(_) => FailureKind::UpstreamReported,
            IngestError::MissingCredential(_) => FailureKind::MissingCredential,
            IngestError::Provider(_) => FailureKind::Provider,
            IngestError::InvalidRequest(_) => FailureKind::InvalidRequest,
            IngestError::Config(_) => FailureKind::Config,
        }
    }

    /// Stage the error is attributed to
    pub fn stage(&self) -> Stage {
        match self {
            IngestError::NoJsonFound => Stage::Extracting,
            IngestError::MalformedJson { .. }
            | IngestError::UnexpectedShape(_)
            | IngestError::UpstreamReported(_) => Stage::Validating,
            IngestError::MissingCredential(_)
            | IngestError::Provider(_)
            | IngestError::InvalidRequest(_)
            | IngestError::Config(_) => Stage::Requesting,
        }
    }

    /// Whether this is the expected "no answer" outcome rather than a defect
    pub fn is_upstream_reported(&self) -> bool {
        matches!(self, IngestError::UpstreamReported(_))
    }

    /// User-facing message for this error
    pub fn user_message(&self) -> &'static str {
        match self.kind() {
            FailureKind::UpstreamReported => NO_MATCH_MESSAGE,
            FailureKind::MissingCredential | FailureKind::Config => CONFIGURATION_MESSAGE,
            FailureKind::InvalidRequest => INVALID_REQUEST_MESSAGE,
            FailureKind::NoJsonFound
            | FailureKind::MalformedJson
            | FailureKind::UnexpectedShape
            | FailureKind::Provider => ENGINE_FAILURE_MESSAGE,
        }
    }
}

/// Truncate `text` to at most `max_chars` characters on a char boundary
pub fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => text[..cut].to_string(),
        None => text.to_string(),
    }
}

impl From<serde_json::Error> for IngestError {
    fn from(e: serde_json::Error) -> Self {
        IngestError::UnexpectedShape(e.to_string())
    }
}

impl From<LlmError> for IngestError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::MissingCredential(vars) => IngestError::MissingCredential(vars),
            other => IngestError::Provider(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt_bounds_chars_not_bytes() {
        let text = "é".repeat(300);
        let cut = excerpt(&text, MAX_EXCERPT_CHARS);
        assert_eq!(cut.chars().count(), 200);
        assert_eq!(excerpt("short", 200), "short");
    }

    #[test]
    fn test_malformed_error_message_is_bounded() {
        let garbage = "{".to_string() + &"x".repeat(9_999);
        let err = IngestError::malformed(&garbage, "expected value");
        match &err {
            IngestError::MalformedJson { excerpt, .. } => {
                assert_eq!(excerpt.chars().count(), MAX_EXCERPT_CHARS)
            }
            other => panic!("Expected MalformedJson, got {:?}", other),
        }
        let message = err.to_string();
        assert!(!message.contains(&garbage[..MAX_EXCERPT_CHARS + 1]));
        assert!(message.len() < 300);
    }

    #[test]
    fn test_upstream_reported_has_friendly_message() {
        let err = IngestError::UpstreamReported("Aucun match trouvé".to_string());
        assert!(err.is_upstream_reported());
        assert_eq!(err.user_message(), NO_MATCH_MESSAGE);
        assert_eq!(err.stage(), Stage::Validating);
    }

    #[test]
    fn test_shape_errors_share_generic_message() {
        let errors = [
            IngestError::NoJsonFound,
            IngestError::malformed("{", "eof"),
            IngestError::UnexpectedShape("missing predictions".to_string()),
        ];
        for err in errors {
            assert_eq!(err.user_message(), ENGINE_FAILURE_MESSAGE);
        }
    }

    #[test]
    fn test_missing_credential_from_llm_error() {
        let err: IngestError = LlmError::MissingCredential("GEMINI_API_KEY".to_string()).into();
        assert_eq!(err.kind(), FailureKind::MissingCredential);
        assert_eq!(err.stage(), Stage::Requesting);
        assert_eq!(err.user_message(), CONFIGURATION_MESSAGE);

        let err: IngestError = LlmError::RateLimitExceeded.into();
        assert_eq!(err.kind(), FailureKind::Provider);
    }
}
