//! Pronos Domain Layer
//!
//! Core records and trait seams for the Pronos prediction engine.
//! Infrastructure (AI providers, caches, the CLI) lives in other crates and
//! depends on the definitions here.
//!
//! ## Key Concepts
//!
//! - **Prediction**: One normalized betting opportunity from a daily feed
//! - **AnalysisResult**: A deep-dive analysis of a single match
//! - **GroundingSource**: A citation surfaced by the provider's search grounding
//! - **SportCategory**: The closed set of sports the product covers
//!
//! ## Architecture
//!
//! - Pure data and trait definitions only
//! - Every record is owned by the caller that requested it
//! - Records are immutable once built; new fetches replace them wholesale

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod grounding;
pub mod prediction;
pub mod sport;
pub mod traits;

// Re-exports for convenience
pub use analysis::{AnalysisQuery, AnalysisResult, ArchivedAnalysis};
pub use grounding::GroundingSource;
pub use prediction::{Prediction, PredictionBatch};
pub use sport::SportCategory;
pub use traits::{Completion, GroundingChunk, KeyValueCache, TextCompletionService, WebChunk};
