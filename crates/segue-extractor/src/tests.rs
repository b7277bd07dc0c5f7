//! End-to-end tests for the Extractor

#[cfg(test)]
mod tests {
    use crate::{
        DetectionVariant, Extractor, ExtractorConfig, ExtractorError, LlmOracle, PairingStrategy,
    };
    use segue_domain::{DocumentLoader, DuplicateEntry, Triple};
    use segue_llm::MockProvider;

    const SCENARIO_ONE: [&str; 5] = ["Intro.", "Transitions :", "Enfin,", "Body one.", "Body two."];

    const MARKER_DOCUMENT: [&str; 9] = [
        "Bulletin du jour.",
        "Transitions :",
        "• Pour finir",
        "Du 12/03",
        "Place au sport",
        "Pour  finir",
        "Enfin,",
        "7 du 12/03",
        "Le conseil municipal s'est réuni hier soir pour voter le budget.",
    ];

    const SHAPE_DOCUMENT: [&str; 5] = [
        "Le conseil municipal a voté le budget.",
        "Place au sport",
        "Le club local a gagné dimanche.",
        "Côté météo maintenant",
        "Il pleuvra demain sur la région.",
    ];

    struct LinesLoader;

    impl DocumentLoader for LinesLoader {
        type Error = std::str::Utf8Error;

        fn load(&self, bytes: &[u8]) -> Result<Vec<String>, Self::Error> {
            Ok(std::str::from_utf8(bytes)?
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(String::from)
                .collect())
        }
    }

    fn shape_config() -> ExtractorConfig {
        ExtractorConfig {
            detection_variant: DetectionVariant::ShapeHeuristic,
            ..ExtractorConfig::default()
        }
    }

    #[test]
    fn test_marker_block_single_triple() {
        let extractor = Extractor::new(ExtractorConfig::default()).unwrap();
        let report = extractor.extract_triples(&SCENARIO_ONE).unwrap();

        assert_eq!(report.triples, vec![Triple::new("Intro.", "Enfin,", "Body one.")]);
        assert_eq!(report.strategy, PairingStrategy::Buffered);
        assert_eq!(report.paragraph_count, 5);
        assert_eq!(report.oracle_calls(), 0);
    }

    #[test]
    fn test_triples_are_deterministic() {
        let extractor = Extractor::new(shape_config()).unwrap();
        let first = extractor.extract_triples(&SHAPE_DOCUMENT).unwrap();
        let second = extractor.extract_triples(&SHAPE_DOCUMENT).unwrap();
        assert_eq!(first.triples, second.triples);
        assert_eq!(first.triples.len(), 2);
    }

    /// Surplus pending transitions are dropped rather than reported.
    #[test]
    fn test_buffered_pending_surplus_is_dropped() {
        let extractor = Extractor::new(ExtractorConfig::default()).unwrap();
        let report = extractor
            .extract_triples(&[
                "Premier sujet du jour.",
                "Transitions",
                "Enfin,",
                "Pour finir",
                "Et pour terminer",
                "Dernier sujet du jour, la météo.",
            ])
            .unwrap();

        assert_eq!(report.triples.len(), 1);
        assert_eq!(report.triples[0].transition, "Enfin,");
        assert_eq!(report.stats.dropped_pending, 2);
    }

    #[test]
    fn test_transition_list_flow() {
        let extractor = Extractor::new(ExtractorConfig::default()).unwrap();
        let report = extractor.extract_transitions(&MARKER_DOCUMENT).unwrap();

        assert_eq!(report.captured, 5);
        assert_eq!(report.unique, vec!["Pour finir", "Place au sport"]);
        assert_eq!(report.duplicates, vec![DuplicateEntry::new("Pour finir", 2)]);
        assert_eq!(report.sampled, report.unique);
        assert_eq!(report.validated, report.unique);
        assert_eq!(report.oracle_calls, 0);
    }

    #[test]
    fn test_transition_list_rejects_date_codes() {
        let extractor = Extractor::new(ExtractorConfig::default()).unwrap();
        let report = extractor.extract_transitions(&MARKER_DOCUMENT).unwrap();
        assert!(!report.unique.iter().any(|t| t == "Du 12/03"));
    }

    #[test]
    fn test_transition_list_sampling() {
        let mut texts = vec!["Transitions".to_string()];
        texts.extend((0..100).map(|i| format!("Rubrique numéro {}", i)));

        let config = ExtractorConfig {
            sample_percent: 10,
            seed: Some(7),
            ..ExtractorConfig::default()
        };
        let extractor = Extractor::new(config).unwrap();
        let report = extractor.extract_transitions(&texts).unwrap();

        assert_eq!(report.unique.len(), 100);
        assert_eq!(report.sampled.len(), 10);
        assert!(report.sampled.iter().all(|t| report.unique.contains(t)));

        let again = extractor.extract_transitions(&texts).unwrap();
        assert_eq!(report.sampled, again.sampled);
    }

    #[test]
    fn test_transition_list_capture_cap() {
        let texts = [
            "Transitions",
            "Pour finir",
            "Place au sport",
            "Côté météo maintenant",
            "Au programme ce soir",
            "Dernière minute",
        ];
        let config = ExtractorConfig {
            capture_cap: 2,
            ..ExtractorConfig::default()
        };
        let extractor = Extractor::new(config).unwrap();
        let report = extractor.extract_transitions(&texts).unwrap();

        assert_eq!(report.captured, 2);
        assert_eq!(report.unique, vec!["Pour finir", "Place au sport"]);
        assert!(!report.unique.iter().any(|t| t == "Au programme ce soir"));
    }

    #[test]
    fn test_transition_list_capture_cap_resumes_at_next_marker() {
        let texts = [
            "Transitions",
            "Pour finir",
            "Place au sport",
            "Côté météo maintenant",
            "Transitions",
            "Au programme ce soir",
        ];
        let config = ExtractorConfig {
            capture_cap: 2,
            ..ExtractorConfig::default()
        };
        let extractor = Extractor::new(config).unwrap();
        let report = extractor.extract_transitions(&texts).unwrap();

        assert_eq!(report.captured, 3);
        assert_eq!(
            report.unique,
            vec!["Pour finir", "Place au sport", "Au programme ce soir"]
        );
    }

    #[test]
    fn test_transition_list_default_capture_cap() {
        let mut texts = vec!["Transitions".to_string()];
        texts.extend((0..250).map(|i| format!("Rubrique numéro {}", i)));

        let extractor = Extractor::new(ExtractorConfig::default()).unwrap();
        let report = extractor.extract_transitions(&texts).unwrap();

        assert_eq!(report.captured, 200);
        assert_eq!(report.unique.len(), 200);
        assert_eq!(report.unique.last().map(String::as_str), Some("Rubrique numéro 199"));
        assert!(!report.unique.iter().any(|t| t == "Rubrique numéro 200"));
    }

    #[test]
    fn test_transition_list_opener_variant() {
        let config = ExtractorConfig {
            detection_variant: DetectionVariant::OpenerList,
            ..ExtractorConfig::default()
        };
        let extractor = Extractor::new(config).unwrap();
        let report = extractor
            .extract_transitions(&[
                "Le conseil municipal a voté le budget.",
                "Dans l'actualité du jour",
                "Le club local a gagné dimanche.",
                "Pour finir, la météo",
            ])
            .unwrap();

        assert_eq!(report.validated, vec!["Dans l'actualité du jour", "Pour finir, la météo"]);
    }

    #[test]
    fn test_transition_list_oracle_selects() {
        let mut provider = MockProvider::new("No");
        provider.add_response("\"Place au sport\"", "Yes");

        let config = ExtractorConfig::validating("mock-model");
        let extractor = Extractor::new(config).unwrap().with_oracle(LlmOracle::new(provider));
        let report = extractor.extract_transitions(&MARKER_DOCUMENT).unwrap();

        assert_eq!(report.validated, vec!["Place au sport"]);
        assert_eq!(report.oracle_calls, 2);
    }

    #[test]
    fn test_oracle_failure_empties_output() {
        let config = ExtractorConfig::validating("mock-model");
        let provider = MockProvider::failing();
        let extractor = Extractor::new(config)
            .unwrap()
            .with_oracle(LlmOracle::new(provider.clone()));

        let triples = extractor.extract_triples(&SCENARIO_ONE).unwrap();
        assert!(triples.is_empty());
        assert_eq!(triples.oracle_calls(), 1);

        let transitions = extractor.extract_transitions(&MARKER_DOCUMENT).unwrap();
        assert!(transitions.is_empty());
        assert_eq!(provider.call_count(), 3);
    }

    #[test]
    fn test_oracle_enabled_without_oracle_rejects_all() {
        let extractor = Extractor::new(ExtractorConfig::validating("mock-model")).unwrap();
        let report = extractor.extract_triples(&SCENARIO_ONE).unwrap();
        assert!(report.is_empty());
        assert_eq!(report.stats.rejected_oracle, 1);
        assert_eq!(report.oracle_calls(), 0);

        let transitions = extractor.extract_transitions(&MARKER_DOCUMENT).unwrap();
        assert!(transitions.is_empty());
        assert_eq!(transitions.oracle_calls, 0);
    }

    #[test]
    fn test_oracle_accepts_with_context() {
        let config = ExtractorConfig {
            use_oracle: true,
            ..shape_config()
        };
        let mut provider = MockProvider::new("No");
        provider.add_response("Paragraph A: Le conseil municipal", "Oui");

        let extractor = Extractor::new(config).unwrap().with_oracle(LlmOracle::new(provider));
        let report = extractor.extract_triples(&SHAPE_DOCUMENT).unwrap();

        assert_eq!(report.triples.len(), 1);
        assert_eq!(report.triples[0].transition, "Place au sport");
        assert_eq!(report.oracle_calls(), 2);
    }

    #[test]
    fn test_limit_total_truncates_output() {
        let config = ExtractorConfig {
            limit_total: Some(1),
            ..shape_config()
        };
        let extractor = Extractor::new(config).unwrap();
        let report = extractor.extract_triples(&SHAPE_DOCUMENT).unwrap();

        assert_eq!(report.triples.len(), 1);
        assert_eq!(report.stats.accepted, 2);
    }

    #[test]
    fn test_strategy_override() {
        let config = ExtractorConfig {
            detection_variant: DetectionVariant::OpenerList,
            strategy: Some(PairingStrategy::Grouped),
            ..ExtractorConfig::default()
        };
        let extractor = Extractor::new(config).unwrap();
        let report = extractor
            .extract_triples(&[
                "Dans l'actualité",
                "Le maire inaugure la médiathèque.",
                "Les travaux ont duré deux ans.",
            ])
            .unwrap();

        assert_eq!(report.strategy, PairingStrategy::Grouped);
        assert_eq!(report.triples.len(), 1);
    }

    #[test]
    fn test_empty_input_is_not_an_error() {
        let empty: [&str; 0] = [];
        for variant in [
            DetectionVariant::MarkerBlock,
            DetectionVariant::OpenerList,
            DetectionVariant::ShapeHeuristic,
        ] {
            let config = ExtractorConfig {
                detection_variant: variant,
                ..ExtractorConfig::default()
            };
            let extractor = Extractor::new(config).unwrap();
            assert!(extractor.extract_triples(&empty).unwrap().is_empty());
            assert!(extractor.extract_transitions(&empty).unwrap().is_empty());
        }
    }

    #[test]
    fn test_document_without_markers_yields_nothing() {
        let extractor = Extractor::new(ExtractorConfig::default()).unwrap();
        let report = extractor
            .extract_triples(&[
                "Le conseil municipal a voté le budget.",
                "Le club local a gagné dimanche.",
            ])
            .unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = ExtractorConfig {
            usage_cap: 0,
            ..ExtractorConfig::default()
        };
        assert!(matches!(Extractor::new(config), Err(ExtractorError::Config(_))));
    }

    #[test]
    fn test_process_document() {
        let extractor = Extractor::new(ExtractorConfig::default()).unwrap();
        let bytes = SCENARIO_ONE.join("\n\n");
        let report = extractor.process_document(&LinesLoader, bytes.as_bytes()).unwrap();
        assert_eq!(report.triples.len(), 1);

        let transitions = extractor
            .process_document_transitions(&LinesLoader, MARKER_DOCUMENT.join("\n").as_bytes())
            .unwrap();
        assert_eq!(transitions.unique.len(), 2);
    }

    #[test]
    fn test_process_document_loader_failure_is_fatal() {
        let extractor = Extractor::new(ExtractorConfig::default()).unwrap();
        let result = extractor.process_document(&LinesLoader, &[0xff, 0xfe, 0x00]);
        assert!(matches!(result, Err(ExtractorError::Loader(_))));
    }
}

#[cfg(test)]
mod proptests {
    use crate::{
        normalize, token_overlap, DetectionVariant, Extractor, ExtractorConfig, LineClassifier,
        PairingStrategy,
    };
    use proptest::prelude::*;
    use std::collections::{HashMap, HashSet};

    const POOL: [&str; 14] = [
        "Le conseil municipal a voté le budget.",
        "Le club local a gagné dimanche.",
        "Le club local a gagné dimanche soir.",
        "Il pleuvra demain sur la région.",
        "La piscine rouvre lundi prochain.",
        "Ce soir, Place au sport revient en direct.",
        "Place au sport",
        "Côté météo maintenant",
        "Enfin, la météo",
        "Pour finir",
        "Enfin,",
        "12 du 03/04",
        "ok",
        "Transitions :",
    ];

    const CANDIDATES: [&str; 6] = [
        "Pour finir",
        "Pour  finir",
        " Pour finir ",
        "Place au sport",
        "Place au\tsport",
        "Côté météo",
    ];

    fn variant() -> impl Strategy<Value = DetectionVariant> {
        prop::sample::select(vec![
            DetectionVariant::MarkerBlock,
            DetectionVariant::OpenerList,
            DetectionVariant::ShapeHeuristic,
        ])
    }

    fn strategy() -> impl Strategy<Value = Option<PairingStrategy>> {
        prop::option::of(prop::sample::select(vec![
            PairingStrategy::Buffered,
            PairingStrategy::Sliding,
            PairingStrategy::Grouped,
        ]))
    }

    proptest! {
        /// Property: normalizing twice equals normalizing once
        #[test]
        fn test_normalize_idempotent(text in "\\PC*") {
            let once = normalize(&text);
            prop_assert_eq!(normalize(&once), once);
        }

        /// Property: the flat list never holds two equal normalized forms
        #[test]
        fn test_flat_list_unique(lines in prop::collection::vec(prop::sample::select(CANDIDATES.to_vec()), 0..20)) {
            let mut texts = vec!["Transitions"];
            texts.extend(lines);

            let extractor = Extractor::new(ExtractorConfig::default()).unwrap();
            let report = extractor.extract_transitions(&texts).unwrap();

            let keys: HashSet<String> = report.validated.iter().map(|t| normalize(t)).collect();
            prop_assert_eq!(keys.len(), report.validated.len());
        }

        /// Property: every emitted triple satisfies the triple invariants
        #[test]
        fn test_triple_invariants(
            texts in prop::collection::vec(prop::sample::select(POOL.to_vec()), 0..40),
            variant in variant(),
            strategy in strategy(),
            usage_cap in 1usize..4,
            threshold in 0.3f64..1.0,
        ) {
            let config = ExtractorConfig {
                detection_variant: variant,
                strategy,
                usage_cap,
                similarity_threshold: threshold,
                ..ExtractorConfig::default()
            };
            let classifier = LineClassifier::new(variant, &config.lexicon).unwrap();
            let extractor = Extractor::new(config).unwrap();
            let report = extractor.extract_triples(&texts).unwrap();

            let mut usage: HashMap<String, usize> = HashMap::new();
            for triple in &report.triples {
                prop_assert!(!triple.paragraph_a.contains(triple.transition.as_str()));
                prop_assert!(!triple.paragraph_b.contains(triple.transition.as_str()));
                prop_assert!(!classifier.is_transition_like(&triple.paragraph_a));
                prop_assert!(!classifier.is_transition_like(&triple.paragraph_b));
                prop_assert!(token_overlap(&triple.paragraph_a, &triple.paragraph_b) < threshold);
                *usage.entry(normalize(&triple.transition)).or_insert(0) += 1;
            }
            prop_assert!(usage.values().all(|&n| n <= usage_cap));
        }

        /// Property: a failing oracle leaves nothing behind
        #[test]
        fn test_failing_oracle_is_closed(
            texts in prop::collection::vec(prop::sample::select(POOL.to_vec()), 1..30),
            variant in variant(),
        ) {
            let config = ExtractorConfig {
                detection_variant: variant,
                use_oracle: true,
                ..ExtractorConfig::default()
            };
            let extractor = Extractor::new(config)
                .unwrap()
                .with_oracle(crate::LlmOracle::new(segue_llm::MockProvider::failing()));

            prop_assert!(extractor.extract_triples(&texts).unwrap().is_empty());
            prop_assert!(extractor.extract_transitions(&texts).unwrap().is_empty());
        }
    }
}
