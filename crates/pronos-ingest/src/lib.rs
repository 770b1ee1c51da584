//! Pronos Ingest
//!
//! Turns free-form AI provider replies into strict prediction and analysis
//! records.
//!
//! # Architecture
//!
//! ```text
//! Prompt → TextCompletionService → extract → validate → normalize/localize → assemble
//! ```
//!
//! The same pipeline serves the daily predictions feed and the match
//! analyzer; each call site differs only in its [`ShapeSpec`].
//!
//! # Key Features
//!
//! - **Payload extraction**: Fenced ```` ```json ```` blocks first, then first-brace/last-brace
//! - **Validation**: Tagged success/refusal outcome, bounded diagnostics
//! - **Normalization**: Sport labels onto a closed enum, UTC instants into civil time
//! - **Error taxonomy**: One [`FailureKind`] per user-facing treatment
//!
//! # Example Usage
//!
//! ```no_run
//! use pronos_ingest::{IngestConfig, IngestionPipeline};
//! use pronos_llm::MockProvider;
//!
//! # async fn example() -> Result<(), pronos_ingest::IngestError> {
//! let llm = MockProvider::new(r#"{"predictions": []}"#);
//! let pipeline = IngestionPipeline::new(llm, IngestConfig::default())?;
//!
//! let batch = pipeline.fetch_predictions(3).await?;
//! println!("Fetched {} predictions", batch.predictions.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod assemble;
mod config;
mod error;
mod extract;
mod generation;
mod pipeline;
mod prompt;
mod sport;
mod timestamp;
mod types;
mod validate;

#[cfg(test)]
mod tests;

pub use assemble::{assemble_analysis, assemble_predictions, collect_sources, prediction_id};
pub use config::IngestConfig;
pub use error::{
    excerpt, FailureKind, IngestError, Stage, CONFIGURATION_MESSAGE, ENGINE_FAILURE_MESSAGE,
    INVALID_REQUEST_MESSAGE, MAX_EXCERPT_CHARS, NO_MATCH_MESSAGE,
};
pub use extract::{extract, ExtractedPayload};
pub use generation::{RequestGeneration, RequestTicket};
pub use pipeline::{Clock, FixedClock, IngestionPipeline, PipelineState, SystemClock};
pub use prompt::{analysis_response_schema, PromptBuilder};
pub use sport::normalize as normalize_sport;
pub use timestamp::{
    localize, parse_instant, DateStyle, LocalizedDateTime, Localizer, DATE_SENTINEL, TIME_SENTINEL,
};
pub use types::{AnalysisPayload, PayloadShape, PredictionItem, PredictionsPayload, ShapeSpec};
pub use validate::{check_shape, parse_payload, validate, ParsedPayload};
