//! Prediction records - one normalized betting opportunity

use crate::{GroundingSource, SportCategory};
use serde::{Deserialize, Serialize};

/// One normalized betting opportunity from the daily feed
///
/// Created once per AI response item and never mutated. A new fetch
/// replaces the whole batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    /// Identifier unique within a batch and across fetches
    pub id: String,

    /// Normalized sport
    pub sport: SportCategory,

    /// Competition or league label (free text)
    pub competition: String,

    /// Match description in "A vs B" form
    #[serde(rename = "match")]
    pub match_name: String,

    /// Bet type description (free text)
    pub bet_type: String,

    /// Localized date string
    pub date: String,

    /// Localized time string
    pub time: String,

    /// Confidence score (percent)
    pub confidence: i64,

    /// Analysis text, prefixed with the competition in brackets
    pub analysis: String,
}

/// Result of a predictions fetch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionBatch {
    /// Predictions in the order the provider returned them
    pub predictions: Vec<Prediction>,

    /// Citations gathered during the request (possibly empty)
    #[serde(default)]
    pub sources: Vec<GroundingSource>,
}

impl PredictionBatch {
    /// Number of predictions in the batch
    pub fn len(&self) -> usize {
        self.predictions.len()
    }

    /// Whether the batch holds no predictions
    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Prediction {
        Prediction {
            id: "LakersvsCeltics-0-1772330400000".to_string(),
            sport: SportCategory::Basketball,
            competition: "NBA".to_string(),
            match_name: "Lakers vs Celtics".to_string(),
            bet_type: "Lakers -4.5".to_string(),
            date: "01.03.2026".to_string(),
            time: "03:00".to_string(),
            confidence: 76,
            analysis: "[NBA] Forme offensive.".to_string(),
        }
    }

    #[test]
    fn test_wire_field_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["match"], "Lakers vs Celtics");
        assert_eq!(json["betType"], "Lakers -4.5");
        assert!(json.get("match_name").is_none());
    }

    #[test]
    fn test_batch_without_sources_deserializes() {
        let json = serde_json::json!({ "predictions": [sample()] });
        let batch: PredictionBatch = serde_json::from_value(json).unwrap();
        assert_eq!(batch.len(), 1);
        assert!(batch.sources.is_empty());
    }
}
