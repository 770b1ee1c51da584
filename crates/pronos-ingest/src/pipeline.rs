//! Ingestion pipeline orchestration

use crate::assemble::{assemble_analysis, assemble_predictions, collect_sources};
use crate::config::IngestConfig;
use crate::error::{FailureKind, IngestError};
use crate::extract::extract;
use crate::prompt::{analysis_response_schema, PromptBuilder};
use crate::timestamp::Localizer;
use crate::types::{AnalysisPayload, PayloadShape, PredictionsPayload};
use crate::validate::validate;
use chrono::{DateTime, Utc};
use pronos_domain::{
    AnalysisQuery, AnalysisResult, Completion, PredictionBatch, TextCompletionService,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Source of the current instant
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// State of one pipeline invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Not started
    Idle,
    /// Waiting on the completion service
    Requesting,
    /// Locating the JSON payload
    Extracting,
    /// Parsing and shape-checking
    Validating,
    /// Building records
    Normalizing,
    /// Finished successfully
    Done,
    /// Finished with an error
    Failed(FailureKind),
}

impl PipelineState {
    /// Whether no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Failed(_))
    }

    /// Whether `next` is a legal successor of this state
    pub fn can_advance_to(&self, next: PipelineState) -> bool {
        use PipelineState::*;
        matches!(
            (self, next),
            (Idle, Requesting)
                | (Requesting, Extracting)
                | (Extracting, Validating)
                | (Validating, Normalizing)
                | (Normalizing, Done)
                | (Requesting | Extracting | Validating, Failed(_))
        )
    }
}

/// Tracks the state of a single invocation
#[derive(Debug)]
struct Run {
    operation: &'static str,
    state: PipelineState,
}

impl Run {
    fn new(operation: &'static str) -> Self {
        Self {
            operation,
            state: PipelineState::Idle,
        }
    }

    fn advance(&mut self, next: PipelineState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal pipeline transition {:?} -> {:?}",
            self.state,
            next
        );
        debug!(operation = self.operation, from = ?self.state, to = ?next, "pipeline transition");
        self.state = next;
    }

    fn fail(&mut self, error: IngestError) -> IngestError {
        if error.is_upstream_reported() {
            info!(operation = self.operation, "Provider found no answer: {}", error);
        } else {
            warn!(
                operation = self.operation,
                stage = ?error.stage(),
                "Ingestion failed: {}",
                error
            );
        }
        self.advance(PipelineState::Failed(error.kind()));
        error
    }
}

/// Sends prompts to the completion service and turns replies into records
///
/// Holds no per-request state: concurrent invocations share only the
/// service handle and the immutable configuration. Nothing is retried here.
pub struct IngestionPipeline<S> {
    service: Arc<S>,
    config: IngestConfig,
    localizer: Localizer,
    clock: Arc<dyn Clock>,
}

impl<S> IngestionPipeline<S>
where
    S: TextCompletionService,
    S::Error: Into<IngestError>,
{
    /// Create a pipeline over `service`
    pub fn new(service: S, config: IngestConfig) -> Result<Self, IngestError> {
        Self::from_arc(Arc::new(service), config)
    }

    /// Create a pipeline over a shared service
    pub fn from_arc(service: Arc<S>, config: IngestConfig) -> Result<Self, IngestError> {
        config.validate().map_err(IngestError::Config)?;
        let localizer = config.localizer().map_err(IngestError::Config)?;
        Ok(Self {
            service,
            config,
            localizer,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replace the clock
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Pipeline configuration
    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Fetch up to `count` predictions
    ///
    /// `count` is clamped to `1..=max_prediction_count`; zero means the
    /// configured default. Fewer predictions than requested is a valid result.
    pub async fn fetch_predictions(&self, count: usize) -> Result<PredictionBatch, IngestError> {
        let mut run = Run::new("fetch_predictions");
        let count = self.clamp_count(count);
        let now = self.clock.now();

        info!("Fetching {} predictions from {}", count, self.service.model_name());

        let prompt = PromptBuilder::new(now, self.config.min_confidence).predictions(count);
        let completion = self.request(&mut run, &prompt, None).await?;
        let mut payload: PredictionsPayload = self.ingest(&mut run, &completion.text)?;

        run.advance(PipelineState::Normalizing);
        payload.retain_confident(self.config.min_confidence);
        if payload.predictions.len() < count {
            info!("Received {} of {} requested predictions", payload.predictions.len(), count);
        }
        let predictions = assemble_predictions(payload, &self.localizer, now.timestamp_millis());
        let sources = collect_sources(&completion.grounding_chunks);
        run.advance(PipelineState::Done);

        info!(
            "Fetched {} predictions with {} sources",
            predictions.len(),
            sources.len()
        );

        Ok(PredictionBatch {
            predictions,
            sources,
        })
    }

    /// Analyze a single match
    pub async fn analyze_match(
        &self,
        query: &AnalysisQuery,
    ) -> Result<AnalysisResult, IngestError> {
        let mut run = Run::new("analyze_match");
        if let Some(field) = missing_query_field(query) {
            run.advance(PipelineState::Requesting);
            return Err(run.fail(IngestError::InvalidRequest(format!("{} is required", field))));
        }

        info!("Analyzing {} ({})", query.match_name(), query.sport);

        let prompt =
            PromptBuilder::new(self.clock.now(), self.config.min_confidence).analysis(query);
        let schema = self.config.structured_analysis.then(analysis_response_schema);
        let completion = self.request(&mut run, &prompt, schema.as_ref()).await?;
        let payload: AnalysisPayload = self.ingest(&mut run, &completion.text)?;

        run.advance(PipelineState::Normalizing);
        let sources = collect_sources(&completion.grounding_chunks);
        let result = assemble_analysis(payload, &self.localizer, sources);
        run.advance(PipelineState::Done);

        info!(
            "Analysis complete: confidence {}, {} sources",
            result.confidence,
            result.sources.len()
        );

        Ok(result)
    }

    async fn request(
        &self,
        run: &mut Run,
        prompt: &str,
        schema: Option<&serde_json::Value>,
    ) -> Result<Completion, IngestError> {
        run.advance(PipelineState::Requesting);
        debug!("Prompt length: {} chars", prompt.len());

        match self.service.complete(prompt, schema).await {
            Ok(completion) => {
                debug!("Response length: {} chars", completion.text.len());
                Ok(completion)
            }
            Err(e) => Err(run.fail(e.into())),
        }
    }

    fn ingest<T: PayloadShape>(&self, run: &mut Run, text: &str) -> Result<T, IngestError> {
        run.advance(PipelineState::Extracting);
        let extracted = extract(text).map_err(|e| run.fail(e))?;

        run.advance(PipelineState::Validating);
        validate(&extracted).map_err(|e| run.fail(e))
    }

    fn clamp_count(&self, count: usize) -> usize {
        match count {
            0 => self.config.prediction_count,
            n if n > self.config.max_prediction_count => {
                warn!(
                    "Requested {} predictions, capping at {}",
                    n, self.config.max_prediction_count
                );
                self.config.max_prediction_count
            }
            n => n,
        }
    }
}

fn missing_query_field(query: &AnalysisQuery) -> Option<&'static str> {
    [
        ("sport", &query.sport),
        ("team1", &query.team1),
        ("team2", &query.team2),
        ("bet_type", &query.bet_type),
    ]
    .into_iter()
    .find(|(_, value)| value.trim().is_empty())
    .map(|(name, _)| name)
}
