//! Pronos CLI library.
//!
//! This library provides the core functionality for the Pronos command-line interface,
//! including configuration management, the local cache, command execution, and
//! output formatting.

pub mod cache;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cache::FileCache;
pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;

use pronos_ingest::IngestError;
use pronos_llm::{resolve_credential, GeminiProvider, CREDENTIAL_VARS};
use tracing::{info, warn};

/// Build the provider from configuration.
///
/// The credential is read from the environment here and nowhere else; its
/// absence is reported as a configuration problem before any request is made.
pub fn build_provider(config: &Config, model_override: Option<&str>) -> Result<GeminiProvider> {
    let api_key = resolve_credential(CREDENTIAL_VARS).map_err(|e| {
        warn!("{}", e);
        IngestError::from(e)
    })?;
    let model = model_override.unwrap_or(&config.ai.model);
    info!("Using model {} at {}", model, config.ai.endpoint);

    let provider = GeminiProvider::new(api_key, model)?
        .with_endpoint(config.ai.endpoint.clone())
        .with_max_retries(config.ai.max_retries)
        .with_search_grounding(config.ai.search_grounding);
    Ok(provider)
}
