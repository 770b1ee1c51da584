//! Payload shapes expected from the model

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

/// Required top-level structure of a validated payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeSpec {
    /// An array under `key`, each item carrying `item_fields`
    List {
        /// Name of the array key
        key: &'static str,
        /// Fields every item must carry
        item_fields: &'static [&'static str],
    },
    /// A single object carrying `fields` at the top level
    Object {
        /// Fields the object must carry
        fields: &'static [&'static str],
    },
}

/// A typed payload with a known shape
pub trait PayloadShape: DeserializeOwned {
    /// Shape checked before deserialization
    const SHAPE: ShapeSpec;
}

/// One item of the predictions feed
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionItem {
    /// Sport label as returned (free text)
    #[serde(default)]
    pub sport: String,

    /// Competition or league
    #[serde(default)]
    pub league: String,

    /// Match description, "A vs B"
    #[serde(rename = "match")]
    pub match_name: String,

    /// Bet type description
    #[serde(default)]
    pub bet_type: String,

    /// Kick-off instant, ISO-8601 UTC
    #[serde(default, rename = "matchDateTimeUTC")]
    pub match_date_time_utc: String,

    /// Probability in percent
    #[serde(default, deserialize_with = "lenient_score")]
    pub probability: i64,

    /// Analysis text
    #[serde(default)]
    pub analysis: String,
}

/// List payload of the predictions feed
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PredictionsPayload {
    /// Items in provider order
    pub predictions: Vec<PredictionItem>,
}

impl PayloadShape for PredictionsPayload {
    const SHAPE: ShapeSpec = ShapeSpec::List {
        key: "predictions",
        item_fields: &["match"],
    };
}

impl PredictionsPayload {
    /// Drop items below `floor`, keeping the order of the rest
    pub fn retain_confident(&mut self, floor: i64) {
        self.predictions.retain(|item| {
            let keep = item.probability >= floor;
            if !keep {
                warn!(
                    "Dropping prediction '{}' with probability {} below floor {}",
                    item.match_name, item.probability, floor
                );
            }
            keep
        });
    }
}

/// Single-object payload of the match analyzer
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisPayload {
    /// Analysis text
    pub analysis: String,

    /// Probability in percent
    #[serde(deserialize_with = "lenient_score")]
    pub probability: i64,

    /// Supporting data points
    #[serde(default)]
    pub key_data: Vec<String>,

    /// Recommended bet
    pub recommended_bet: String,

    /// Why the bet is recommended
    #[serde(default)]
    pub recommendation_reason: String,

    /// Kick-off instant, ISO-8601 UTC
    #[serde(default, rename = "matchDateTimeUTC")]
    pub match_date_time_utc: String,
}

impl PayloadShape for AnalysisPayload {
    const SHAPE: ShapeSpec = ShapeSpec::Object {
        fields: &["analysis", "probability", "recommendedBet"],
    };
}

/// Accept integers, floats (rounded) and numeric strings such as `"76%"`,
/// within `0..=100`
fn lenient_score<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    score_from_value(&value)
        .ok_or_else(|| de::Error::custom(format!("invalid probability: {}", value)))
}

fn score_from_value(value: &Value) -> Option<i64> {
    let score = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s
            .trim()
            .trim_end_matches('%')
            .trim()
            .replace(',', ".")
            .parse::<f64>()
            .ok()?,
        _ => return None,
    };
    percent(score)
}

fn percent(score: f64) -> Option<i64> {
    if score.is_finite() && (0.0..=100.0).contains(&score) {
        Some(score.round() as i64)
    } else {
        None
    }
}
