//! Error types for the CLI application.

use pronos_ingest::IngestError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// Exit code for hard failures.
pub const EXIT_FAILURE: i32 = 1;

/// Exit code when the provider reported that nothing matched.
pub const EXIT_NO_MATCH: i32 = 2;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Provider construction or credential error
    #[error("Provider error: {0}")]
    Llm(#[from] pronos_llm::LlmError),

    /// Pipeline error
    #[error("{}", .0.user_message())]
    Ingest(#[from] IngestError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// No archived analysis with this id
    #[error("No archived analysis with id {0}")]
    NotFound(String),
}

impl CliError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Ingest(e) if e.is_upstream_reported() => EXIT_NO_MATCH,
            _ => EXIT_FAILURE,
        }
    }
}
