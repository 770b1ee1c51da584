//! Analyze command implementation.

use crate::cache::{load_archive, save_archive};
use crate::cli::AnalyzeArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use pronos_domain::{
    AnalysisQuery, AnalysisResult, ArchivedAnalysis, KeyValueCache, TextCompletionService,
};
use pronos_ingest::{IngestError, IngestionPipeline};
use tracing::info;

/// Execute the analyze command.
pub async fn execute_analyze<S, C>(
    args: AnalyzeArgs,
    pipeline: &IngestionPipeline<S>,
    cache: &mut C,
    formatter: &Formatter,
) -> Result<()>
where
    S: TextCompletionService,
    S::Error: Into<IngestError>,
    C: KeyValueCache<Error = CliError>,
{
    let archive = args.archive;
    let query = AnalysisQuery {
        sport: args.sport,
        team1: args.team1,
        team2: args.team2,
        bet_type: args.bet_type,
    };

    let result = pipeline.analyze_match(&query).await?;
    println!("{}", formatter.format_analysis(&result)?);

    if archive {
        let id = archive_analysis(cache, query, result)?;
        println!("{}", formatter.success(&format!("Analysis archived: {}", id)));
    }

    Ok(())
}

/// Prepend an analysis to the archive and return its id.
pub fn archive_analysis<C>(
    cache: &mut C,
    query: AnalysisQuery,
    result: AnalysisResult,
) -> Result<String>
where
    C: KeyValueCache<Error = CliError>,
{
    let entry = ArchivedAnalysis::new(query, result);
    let id = entry.id.clone();

    let mut archive = load_archive(cache)?;
    archive.insert(0, entry);
    save_archive(cache, &archive)?;

    info!("Archived analysis {} ({} entries)", id, archive.len());
    Ok(id)
}
