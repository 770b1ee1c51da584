//! Prompt construction for the predictions feed and the match analyzer

use chrono::{DateTime, SecondsFormat, Utc};
use pronos_domain::{AnalysisQuery, SportCategory};
use serde_json::{json, Value};

/// Builds prompts for the model
pub struct PromptBuilder {
    now: DateTime<Utc>,
    min_confidence: i64,
}

impl PromptBuilder {
    /// Create a builder anchored at `now`
    pub fn new(now: DateTime<Utc>, min_confidence: i64) -> Self {
        Self {
            now,
            min_confidence,
        }
    }

    fn now_iso(&self) -> String {
        self.now.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Prompt for a batch of `count` predictions
    pub fn predictions(&self, count: usize) -> String {
        let sports = SportCategory::ALL
            .iter()
            .map(SportCategory::as_str)
            .collect::<Vec<_>>()
            .join(", ");

        let mut prompt = String::new();

        // 1. Role and task
        prompt.push_str(PREDICTIONS_INSTRUCTIONS);
        prompt.push_str("\n\n");

        // 2. Reference instant and request parameters
        prompt.push_str(&format!("Date et heure actuelles (UTC) : {}\n", self.now_iso()));
        prompt.push_str(&format!("Nombre de pronostics demandés : {}\n", count));
        prompt.push_str(&format!("Sports autorisés : {}\n", sports));
        prompt.push_str(&format!(
            "Probabilité minimale : {}%. N'inclus aucun pari en dessous de ce seuil.\n\n",
            self.min_confidence
        ));

        // 3. Output format reminder
        prompt.push_str(PREDICTIONS_FORMAT);

        prompt
    }

    /// Prompt for a single-match analysis
    pub fn analysis(&self, query: &AnalysisQuery) -> String {
        let mut prompt = String::new();

        prompt.push_str(ANALYSIS_INSTRUCTIONS);
        prompt.push_str("\n\n");

        prompt.push_str(&format!("Date et heure actuelles (UTC) : {}\n", self.now_iso()));
        prompt.push_str(&format!("Sport : {}\n", query.sport));
        prompt.push_str(&format!("Match : {}\n", query.match_name()));
        prompt.push_str(&format!("Pari à évaluer : {}\n\n", query.bet_type));

        prompt.push_str(ANALYSIS_FORMAT);

        prompt
    }
}

/// Response schema for structured analyzer requests
pub fn analysis_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "analysis": { "type": "STRING" },
            "probability": { "type": "INTEGER" },
            "keyData": { "type": "ARRAY", "items": { "type": "STRING" } },
            "recommendedBet": { "type": "STRING" },
            "recommendationReason": { "type": "STRING" },
            "matchDateTimeUTC": { "type": "STRING" },
            "error": { "type": "STRING" }
        },
        "required": ["analysis", "probability", "recommendedBet"]
    })
}

const PREDICTIONS_INSTRUCTIONS: &str = r#"Tu es un analyste sportif spécialisé dans les paris.
Recherche les prochains matchs réels qui auront lieu APRÈS la date et l'heure actuelles
et sélectionne les paris les plus sûrs.

Règles :
- Vérifie chaque date et heure de match avec une source fiable
- Donne l'heure de début en UTC au format ISO-8601 (ex. "2026-03-01T20:45:00.000Z")
- "match" suit la forme "Équipe A vs Équipe B"
- "probability" est un entier en pourcentage
- "analysis" tient en deux ou trois phrases factuelles"#;

const PREDICTIONS_FORMAT: &str = r#"Format de sortie (JSON uniquement) :
{
  "predictions": [
    {
      "sport": "Football | Basketball | Tennis",
      "league": "compétition",
      "match": "Équipe A vs Équipe B",
      "betType": "pari conseillé",
      "matchDateTimeUTC": "ISO-8601",
      "probability": 0-100,
      "analysis": "analyse courte"
    }
  ]
}

Si aucun match ne convient, réponds uniquement : {"error": "raison"}"#;

const ANALYSIS_INSTRUCTIONS: &str = r#"Tu es un analyste sportif spécialisé dans les paris.
Analyse en profondeur le prochain affrontement entre les deux équipes ou joueurs ci-dessous
qui aura lieu APRÈS la date et l'heure actuelles, puis évalue le pari proposé."#;

const ANALYSIS_FORMAT: &str = r#"Format de sortie (JSON uniquement) :
{
  "analysis": "analyse détaillée",
  "probability": 0-100,
  "keyData": ["donnée clé", "..."],
  "recommendedBet": "pari recommandé",
  "recommendationReason": "justification",
  "matchDateTimeUTC": "ISO-8601"
}

Si le match est introuvable, réponds uniquement : {"error": "raison"}"#;
