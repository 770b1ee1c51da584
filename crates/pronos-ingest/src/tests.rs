//! Integration tests for the ingestion pipeline

#[cfg(test)]
mod tests {
    use crate::{
        DateStyle, FailureKind, FixedClock, IngestConfig, IngestError, IngestionPipeline,
        NO_MATCH_MESSAGE,
    };
    use chrono::{TimeZone, Utc};
    use pronos_domain::{AnalysisQuery, GroundingChunk, SportCategory, WebChunk};
    use pronos_llm::{LlmError, MockProvider};

    const SCENARIO: &str = "Voici le résultat: ```json\n{\"predictions\":[{\"sport\":\"BASKET\",\"league\":\"NBA\",\"match\":\"Lakers vs Celtics\",\"betType\":\"Lakers -4.5\",\"matchDateTimeUTC\":\"2026-03-01T02:00:00.000Z\",\"probability\":76,\"analysis\":\"Forme offensive.\"}]}\n``` Merci.";

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 2, 28, 12, 0, 0).unwrap())
    }

    fn pipeline(llm: MockProvider) -> IngestionPipeline<MockProvider> {
        IngestionPipeline::new(llm, IngestConfig::default())
            .unwrap()
            .with_clock(clock())
    }

    fn query() -> AnalysisQuery {
        AnalysisQuery {
            sport: "Football".to_string(),
            team1: "PSG".to_string(),
            team2: "OM".to_string(),
            bet_type: "Victoire PSG".to_string(),
        }
    }

    #[tokio::test]
    async fn test_end_to_end_fenced_scenario() {
        let pipeline = pipeline(MockProvider::new(SCENARIO));

        let batch = pipeline.fetch_predictions(1).await.unwrap();

        assert_eq!(batch.predictions.len(), 1);
        let prediction = &batch.predictions[0];
        assert_eq!(prediction.sport, SportCategory::Basketball);
        assert_eq!(prediction.match_name, "Lakers vs Celtics");
        assert_eq!(prediction.bet_type, "Lakers -4.5");
        assert_eq!(prediction.analysis, "[NBA] Forme offensive.");
        assert_eq!(prediction.confidence, 76);
        // 2026-03-01 is before the EU switch to summer time: UTC+1.
        assert_eq!(prediction.date, "01.03.2026");
        assert_eq!(prediction.time, "03:00");
        assert_eq!(
            prediction.id,
            format!("LakersvsCeltics-0-{}", clock().0.timestamp_millis())
        );
        assert!(batch.sources.is_empty());
    }

    #[tokio::test]
    async fn test_prompt_carries_reference_instant_and_count() {
        let llm = MockProvider::new(r#"{"predictions": []}"#);
        let pipeline = pipeline(llm.clone());

        pipeline.fetch_predictions(4).await.unwrap();

        let prompt = llm.last_prompt().unwrap();
        assert!(prompt.contains("2026-02-28T12:00:00.000Z"));
        assert!(prompt.contains("Nombre de pronostics demandés : 4"));
        assert!(llm.last_schema().is_none());
    }

    #[tokio::test]
    async fn test_partial_batch_is_not_an_error() {
        let pipeline = pipeline(MockProvider::new(
            r#"{"predictions": [{"match": "A vs B", "sport": "Tennis", "probability": 71}]}"#,
        ));
        let batch = pipeline.fetch_predictions(3).await.unwrap();
        assert_eq!(batch.predictions.len(), 1);
        assert_eq!(batch.predictions[0].sport, SportCategory::Tennis);
    }

    #[tokio::test]
    async fn test_low_confidence_items_are_dropped() {
        let pipeline = pipeline(MockProvider::new(
            r#"{"predictions": [
                {"match": "A vs B", "probability": 90},
                {"match": "C vs D", "probability": 40},
                {"match": "E vs F", "probability": "72%"}
            ]}"#,
        ));
        let batch = pipeline.fetch_predictions(3).await.unwrap();
        let names: Vec<_> = batch.predictions.iter().map(|p| p.match_name.as_str()).collect();
        assert_eq!(names, ["A vs B", "E vs F"]);
        // Indices are assigned after filtering.
        assert!(batch.predictions[1].id.starts_with("EvsF-1-"));
    }

    #[tokio::test]
    async fn test_count_is_clamped() {
        let llm = MockProvider::new(r#"{"predictions": []}"#);
        let pipeline = pipeline(llm.clone());

        pipeline.fetch_predictions(50).await.unwrap();
        assert!(llm.last_prompt().unwrap().contains("Nombre de pronostics demandés : 10"));

        pipeline.fetch_predictions(0).await.unwrap();
        assert!(llm.last_prompt().unwrap().contains("Nombre de pronostics demandés : 3"));
    }

    #[tokio::test]
    async fn test_upstream_error_is_surfaced_distinctly() {
        let pipeline = pipeline(MockProvider::new(r#"{"error": "Aucun match trouvé"}"#));

        let err = pipeline.fetch_predictions(3).await.unwrap_err();
        assert_eq!(err, IngestError::UpstreamReported("Aucun match trouvé".to_string()));
        assert_eq!(err.kind(), FailureKind::UpstreamReported);
        assert_eq!(err.user_message(), NO_MATCH_MESSAGE);
    }

    #[tokio::test]
    async fn test_prose_only_response_is_no_json() {
        let pipeline = pipeline(MockProvider::new("Désolé, je ne peux pas aider."));
        let err = pipeline.fetch_predictions(3).await.unwrap_err();
        assert_eq!(err, IngestError::NoJsonFound);
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let pipeline = pipeline(MockProvider::new("{\"predictions\": [ {\"match\": }"));
        let err = pipeline.fetch_predictions(3).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::MalformedJson);
    }

    #[tokio::test]
    async fn test_wrong_shape_response() {
        let pipeline = pipeline(MockProvider::new(r#"{"matches": []}"#));
        let err = pipeline.fetch_predictions(3).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::UnexpectedShape);
    }

    #[tokio::test]
    async fn test_probability_above_hundred_is_wrong_shape() {
        let reply = r#"{"predictions": [{"match": "PSG vs OM", "probability": "250%"}]}"#;
        let pipeline = pipeline(MockProvider::new(reply));
        let err = pipeline.fetch_predictions(1).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::UnexpectedShape);
    }

    #[tokio::test]
    async fn test_provider_failure_is_requesting_stage() {
        let mut llm = MockProvider::default();
        llm.add_error("pronostics");
        let pipeline = pipeline(llm);

        let err = pipeline.fetch_predictions(3).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Provider);
    }

    #[tokio::test]
    async fn test_no_internal_retry() {
        let llm = MockProvider::new("rien");
        let pipeline = pipeline(llm.clone());

        assert!(pipeline.fetch_predictions(3).await.is_err());
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_grounding_sources_are_attached() {
        let llm = MockProvider::new(SCENARIO).with_grounding(vec![
            GroundingChunk {
                web: Some(WebChunk {
                    uri: "https://www.nba.com/schedule".to_string(),
                    title: Some("NBA Schedule".to_string()),
                }),
            },
            GroundingChunk { web: None },
        ]);
        let batch = pipeline(llm).fetch_predictions(1).await.unwrap();
        assert_eq!(batch.sources.len(), 1);
        assert_eq!(batch.sources[0].title.as_deref(), Some("NBA Schedule"));
    }

    #[tokio::test]
    async fn test_analyze_match() {
        let llm = MockProvider::new(
            "Analyse :\n```json\n{\"analysis\": \"PSG en forme\", \"probability\": 78, \
             \"keyData\": [\"4 victoires\", \"Mbappé absent\"], \"recommendedBet\": \"Victoire PSG\", \
             \"recommendationReason\": \"Domicile\", \"matchDateTimeUTC\": \"2026-01-01T23:30:00Z\"}\n```",
        )
        .with_grounding(vec![GroundingChunk {
            web: Some(WebChunk {
                uri: "https://www.ligue1.fr".to_string(),
                title: None,
            }),
        }]);
        let pipeline = pipeline(llm.clone());

        let result = pipeline.analyze_match(&query()).await.unwrap();

        assert_eq!(result.analysis, "PSG en forme");
        assert_eq!(result.confidence, 78);
        assert_eq!(result.key_data, ["4 victoires", "Mbappé absent"]);
        assert_eq!(result.recommended_bet, "Victoire PSG");
        assert_eq!(result.date, "02.01.2026");
        assert_eq!(result.time, "00:30");
        assert_eq!(result.sources.len(), 1);
        assert!(llm.last_prompt().unwrap().contains("PSG vs OM"));
        assert!(llm.last_schema().is_none());
    }

    #[tokio::test]
    async fn test_analyze_match_low_confidence_is_kept() {
        let pipeline = pipeline(MockProvider::new(
            r#"{"analysis": "Incertain", "probability": 52, "recommendedBet": "Match nul"}"#,
        ));
        let result = pipeline.analyze_match(&query()).await.unwrap();
        assert_eq!(result.confidence, 52);
        assert!(result.key_data.is_empty());
        assert_eq!(result.date, "--.--.----");
    }

    #[tokio::test]
    async fn test_structured_analysis_sends_schema() {
        let llm = MockProvider::new(
            r#"{"analysis": "ok", "probability": 80, "recommendedBet": "PSG"}"#,
        );
        let config = IngestConfig {
            structured_analysis: true,
            date_style: DateStyle::Slash,
            ..IngestConfig::default()
        };
        let pipeline = IngestionPipeline::new(llm.clone(), config)
            .unwrap()
            .with_clock(clock());

        pipeline.analyze_match(&query()).await.unwrap();
        let schema = llm.last_schema().unwrap();
        assert_eq!(schema["type"], "OBJECT");
    }

    #[tokio::test]
    async fn test_analyze_match_upstream_error() {
        let pipeline = pipeline(MockProvider::new(r#"{"error": "Match introuvable"}"#));
        let err = pipeline.analyze_match(&query()).await.unwrap_err();
        assert!(err.is_upstream_reported());
    }

    #[tokio::test]
    async fn test_analyze_match_rejects_incomplete_query() {
        let llm = MockProvider::new("{}");
        let pipeline = pipeline(llm.clone());
        let mut query = query();
        query.team1.clear();

        let err = pipeline.analyze_match(&query).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::InvalidRequest);
        assert_eq!(llm.call_count(), 0);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = IngestConfig {
            timezone: "Nowhere/Land".to_string(),
            ..IngestConfig::default()
        };
        let result = IngestionPipeline::new(MockProvider::default(), config);
        assert!(matches!(result, Err(IngestError::Config(_))));
    }

    #[test]
    fn test_missing_credential_maps_to_distinct_kind() {
        let err: IngestError = LlmError::MissingCredential("GEMINI_API_KEY".to_string()).into();
        assert_eq!(err.kind(), FailureKind::MissingCredential);
        assert_ne!(err.user_message(), IngestError::NoJsonFound.user_message());
    }

    #[tokio::test]
    async fn test_concurrent_invocations_are_independent() {
        let mut llm = MockProvider::new(r#"{"error": "rien"}"#);
        llm.add_response(
            "PSG vs OM",
            r#"{"analysis": "a", "probability": 75, "recommendedBet": "PSG"}"#,
        );
        let pipeline = pipeline(llm);
        let query = query();

        let (analysis, batch) = tokio::join!(
            pipeline.analyze_match(&query),
            pipeline.fetch_predictions(2)
        );
        assert_eq!(analysis.unwrap().confidence, 75);
        assert!(batch.unwrap_err().is_upstream_reported());
    }
}
