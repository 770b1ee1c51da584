//! Configuration for the ingestion pipeline

use crate::timestamp::{DateStyle, Localizer};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Configuration for the ingestion pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// IANA timezone match times are displayed in
    pub timezone: String,

    /// Date rendering convention
    pub date_style: DateStyle,

    /// Lowest probability (percent) a feed prediction may carry
    pub min_confidence: i64,

    /// Predictions requested when the caller does not say
    pub prediction_count: usize,

    /// Upper bound on predictions per request
    pub max_prediction_count: usize,

    /// Constrain analyzer output with a response schema
    ///
    /// Structured requests cannot use search grounding, so they carry no sources.
    pub structured_analysis: bool,
}

impl IngestConfig {
    /// Parse the configured timezone
    pub fn timezone(&self) -> Result<Tz, String> {
        Tz::from_str(&self.timezone).map_err(|_| {
            format!(
                "Invalid timezone: {} (expected IANA tz like Europe/Paris)",
                self.timezone
            )
        })
    }

    /// Localizer for the configured timezone and date style
    pub fn localizer(&self) -> Result<Localizer, String> {
        Ok(Localizer::new(self.timezone()?, self.date_style))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        self.timezone()?;
        if !(0..=100).contains(&self.min_confidence) {
            return Err("min_confidence must be between 0 and 100".to_string());
        }
        if self.prediction_count == 0 {
            return Err("prediction_count must be greater than 0".to_string());
        }
        if self.max_prediction_count == 0 {
            return Err("max_prediction_count must be greater than 0".to_string());
        }
        if self.prediction_count > self.max_prediction_count {
            return Err("prediction_count cannot exceed max_prediction_count".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            timezone: "Europe/Paris".to_string(),
            date_style: DateStyle::Dot,
            min_confidence: 70,
            prediction_count: 3,
            max_prediction_count: 10,
            structured_analysis: false,
        }
    }
}
