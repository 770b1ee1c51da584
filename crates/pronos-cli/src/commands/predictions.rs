//! Predictions command implementation.

use crate::cache::{latest_predictions, write_json, LATEST_PREDICTIONS_KEY};
use crate::cli::PredictionsArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use pronos_domain::{KeyValueCache, PredictionBatch, TextCompletionService};
use pronos_ingest::{IngestError, IngestionPipeline, RequestGeneration};
use tracing::{debug, info};

/// Execute the predictions command.
///
/// A non-empty cached batch is served unless `--refresh` is given; the
/// pipeline is only built, and the credential only read, when a fetch is
/// needed.
pub async fn execute_predictions<S, C, F>(
    args: PredictionsArgs,
    cache: &mut C,
    generation: &RequestGeneration,
    formatter: &Formatter,
    build_pipeline: F,
) -> Result<()>
where
    S: TextCompletionService,
    S::Error: Into<IngestError>,
    C: KeyValueCache<Error = CliError>,
    F: FnOnce() -> Result<IngestionPipeline<S>>,
{
    if !args.refresh {
        if let Some(batch) = latest_predictions(cache)?.filter(|b| !b.is_empty()) {
            info!("Serving {} cached predictions", batch.len());
            println!("{}", formatter.format_predictions(&batch)?);
            return Ok(());
        }
    }

    let pipeline = build_pipeline()?;
    let count = args.count.unwrap_or(0);
    let batch = refresh_predictions(&pipeline, cache, generation, count).await?;
    println!("{}", formatter.format_predictions(&batch)?);

    Ok(())
}

/// Fetch a new batch and store it unless a newer request was issued meanwhile.
///
/// Every call issues a ticket from `generation`. Callers that overlap fetches
/// share one generation; a result whose ticket is no longer current is
/// returned but never written to the cache.
pub async fn refresh_predictions<S, C>(
    pipeline: &IngestionPipeline<S>,
    cache: &mut C,
    generation: &RequestGeneration,
    count: usize,
) -> Result<PredictionBatch>
where
    S: TextCompletionService,
    S::Error: Into<IngestError>,
    C: KeyValueCache<Error = CliError>,
{
    let ticket = generation.issue();
    let batch = pipeline.fetch_predictions(count).await?;

    if generation.is_current(ticket) {
        write_json(cache, LATEST_PREDICTIONS_KEY, &batch)?;
    } else {
        debug!(
            "Discarding result of superseded request {}",
            ticket.generation()
        );
    }

    Ok(batch)
}
