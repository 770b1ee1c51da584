//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use pronos_domain::{AnalysisResult, ArchivedAnalysis, GroundingSource, PredictionBatch};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a prediction batch.
    pub fn format_predictions(&self, batch: &PredictionBatch) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(batch)?),
            OutputFormat::Table => Ok(self.format_predictions_table(batch)),
            OutputFormat::Quiet => Ok(batch
                .predictions
                .iter()
                .map(|p| p.id.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    fn format_predictions_table(&self, batch: &PredictionBatch) -> String {
        if batch.is_empty() {
            return self.colorize("No predictions found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Sport", "Competition", "Match", "Bet", "Date", "Time", "Confidence"]);

        for prediction in &batch.predictions {
            builder.push_record([
                prediction.sport.as_str(),
                &prediction.competition,
                &prediction.match_name,
                &prediction.bet_type,
                &prediction.date,
                &prediction.time,
                &format!("{}%", prediction.confidence),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        let mut out = table.to_string();
        for prediction in &batch.predictions {
            out.push_str(&format!(
                "\n\n{}\n{}",
                self.colorize(&prediction.match_name, "cyan"),
                prediction.analysis
            ));
        }
        out.push_str(&self.format_sources(&batch.sources));
        out
    }

    /// Format a match analysis.
    pub fn format_analysis(&self, result: &AnalysisResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
            OutputFormat::Table => Ok(self.format_analysis_text(result)),
            OutputFormat::Quiet => Ok(format!(
                "{}\t{}%",
                result.recommended_bet, result.confidence
            )),
        }
    }

    fn format_analysis_text(&self, result: &AnalysisResult) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "{} {}\n",
            self.colorize("Pari recommandé :", "cyan"),
            result.recommended_bet
        ));
        out.push_str(&format!("Confiance : {}\n", self.confidence(result.confidence)));
        out.push_str(&format!("Date : {} {}\n\n", result.date, result.time));
        out.push_str(&result.analysis);
        out.push('\n');

        if !result.key_data.is_empty() {
            out.push_str("\nDonnées clés :\n");
            for item in &result.key_data {
                out.push_str(&format!("  - {}\n", item));
            }
        }
        if !result.recommendation_reason.is_empty() {
            out.push_str(&format!("\nPourquoi : {}\n", result.recommendation_reason));
        }
        out.push_str(&self.format_sources(&result.sources));
        out
    }

    /// Format the archive listing.
    pub fn format_archive(&self, archive: &[ArchivedAnalysis]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(archive)?),
            OutputFormat::Quiet => Ok(archive
                .iter()
                .map(|a| a.id.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if archive.is_empty() {
                    return Ok(self.colorize("Archive is empty.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["ID", "Sport", "Match", "Bet", "Recommended", "Confidence"]);
                for entry in archive {
                    builder.push_record([
                        entry.id.as_str(),
                        &entry.query.sport,
                        &entry.query.match_name(),
                        &entry.query.bet_type,
                        &entry.result.recommended_bet,
                        &format!("{}%", entry.result.confidence),
                    ]);
                }

                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));
                Ok(table.to_string())
            }
        }
    }

    /// Format one archived analysis.
    pub fn format_archived(&self, entry: &ArchivedAnalysis) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(entry)?),
            OutputFormat::Quiet => Ok(entry.id.clone()),
            OutputFormat::Table => Ok(format!(
                "{} ({}, {})\n\n{}",
                self.colorize(&entry.query.match_name(), "cyan"),
                entry.query.sport,
                entry.query.bet_type,
                self.format_analysis_text(&entry.result)
            )),
        }
    }

    fn format_sources(&self, sources: &[GroundingSource]) -> String {
        if sources.is_empty() {
            return String::new();
        }
        let mut out = String::from("\n\nSources :\n");
        for source in sources {
            out.push_str(&format!("  - {} <{}>\n", source.label(), source.uri));
        }
        out
    }

    fn confidence(&self, confidence: i64) -> String {
        let text = format!("{}%", confidence);
        match confidence {
            80.. => self.colorize(&text, "green"),
            70..=79 => self.colorize(&text, "yellow"),
            _ => self.colorize(&text, "red"),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}
