//! Match analysis records and their archived form

use crate::GroundingSource;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Parameters of an analyzer request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisQuery {
    /// Sport label as entered by the user
    pub sport: String,

    /// Home side / first player
    pub team1: String,

    /// Away side / second player
    pub team2: String,

    /// Bet the user wants assessed
    pub bet_type: String,
}

impl AnalysisQuery {
    /// Match description in "A vs B" form
    pub fn match_name(&self) -> String {
        format!("{} vs {}", self.team1, self.team2)
    }
}

/// One normalized deep-dive analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Free-text analysis
    pub analysis: String,

    /// Confidence score (percent)
    pub confidence: i64,

    /// Short supporting data points, in provider order
    pub key_data: Vec<String>,

    /// Recommended bet
    pub recommended_bet: String,

    /// Why the bet is recommended
    pub recommendation_reason: String,

    /// Localized date string
    pub date: String,

    /// Localized time string
    pub time: String,

    /// Citations (possibly empty, never absent)
    #[serde(default)]
    pub sources: Vec<GroundingSource>,
}

/// An analysis kept by the dashboard archive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedAnalysis {
    /// UUIDv7 identifier
    pub id: String,

    /// The query that produced the analysis
    pub query: AnalysisQuery,

    /// The analysis itself
    pub result: AnalysisResult,

    /// When the analysis was archived (ms since Unix epoch)
    pub archived_at: i64,
}

impl ArchivedAnalysis {
    /// Archive an analysis now
    pub fn new(query: AnalysisQuery, result: AnalysisResult) -> Self {
        let archived_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0);
        Self::at(query, result, archived_at)
    }

    /// Archive an analysis with an explicit timestamp
    pub fn at(query: AnalysisQuery, result: AnalysisResult, archived_at: i64) -> Self {
        Self {
            id: uuid::Uuid::now_v7().to_string(),
            query,
            result,
            archived_at,
        }
    }
}
