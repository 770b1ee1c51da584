//! Build finished domain records from validated payloads

use crate::sport;
use crate::timestamp::Localizer;
use crate::types::{AnalysisPayload, PredictionItem, PredictionsPayload};
use pronos_domain::{AnalysisResult, GroundingChunk, GroundingSource, Prediction};
use std::collections::HashSet;

/// Identifier for the prediction at `index` of a batch generated at `generated_at_ms`
pub fn prediction_id(match_name: &str, index: usize, generated_at_ms: i64) -> String {
    let compact: String = match_name.chars().filter(|c| !c.is_whitespace()).collect();
    format!("{}-{}-{}", compact, index, generated_at_ms)
}

/// One prediction per payload item, in payload order
///
/// Items are neither deduplicated nor reordered; the index component keeps
/// identifiers distinct for repeated matches.
pub fn assemble_predictions(
    payload: PredictionsPayload,
    localizer: &Localizer,
    generated_at_ms: i64,
) -> Vec<Prediction> {
    payload
        .predictions
        .into_iter()
        .enumerate()
        .map(|(index, item)| assemble_prediction(item, index, localizer, generated_at_ms))
        .collect()
}

fn assemble_prediction(
    item: PredictionItem,
    index: usize,
    localizer: &Localizer,
    generated_at_ms: i64,
) -> Prediction {
    let when = localizer.localize(&item.match_date_time_utc);
    let competition = item.league.trim().to_string();
    let analysis = if competition.is_empty() {
        item.analysis
    } else {
        format!("[{}] {}", competition, item.analysis)
    };

    Prediction {
        id: prediction_id(&item.match_name, index, generated_at_ms),
        sport: sport::normalize(&item.sport),
        competition,
        match_name: item.match_name,
        bet_type: item.bet_type,
        date: when.date,
        time: when.time,
        confidence: item.probability,
        analysis,
    }
}

/// Analysis record; fields other than the timestamp pass through verbatim
pub fn assemble_analysis(
    payload: AnalysisPayload,
    localizer: &Localizer,
    sources: Vec<GroundingSource>,
) -> AnalysisResult {
    let when = localizer.localize(&payload.match_date_time_utc);
    AnalysisResult {
        analysis: payload.analysis,
        confidence: payload.probability,
        key_data: payload.key_data,
        recommended_bet: payload.recommended_bet,
        recommendation_reason: payload.recommendation_reason,
        date: when.date,
        time: when.time,
        sources,
    }
}

/// Web citations from grounding metadata
///
/// Non-web chunks and empty URIs are skipped; repeated URIs keep their
/// first occurrence.
pub fn collect_sources(chunks: &[GroundingChunk]) -> Vec<GroundingSource> {
    let mut seen = HashSet::new();
    chunks
        .iter()
        .filter_map(|chunk| chunk.web.as_ref())
        .filter(|web| !web.uri.trim().is_empty())
        .filter(|web| seen.insert(web.uri.clone()))
        .map(|web| GroundingSource::new(web.uri.clone(), web.title.clone()))
        .collect()
}
