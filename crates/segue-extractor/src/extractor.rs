//! Core Extractor implementation

use crate::builder::{BuildLimits, TripleBuilder};
use crate::classifier::{LineClassifier, LineKind, SequenceView};
use crate::config::{DetectionVariant, ExtractorConfig};
use crate::error::ExtractorError;
use crate::filter::CandidateFilter;
use crate::normalize::{dedupe, sample_seeded};
use crate::oracle::OracleGate;
use crate::types::{TransitionReport, TripleReport};
use segue_domain::{DocumentLoader, Paragraph, TransitionOracle};
use std::time::Instant;
use tracing::{debug, info};

/// Runs the extraction pipeline over one document at a time
///
/// Runs share nothing: usage counters and duplicate tracking live only for
/// the duration of a single call.
#[derive(Debug)]
pub struct Extractor {
    config: ExtractorConfig,
    classifier: LineClassifier,
    filter: CandidateFilter,
    gate: OracleGate,
}

impl Extractor {
    /// Create an Extractor, validating `config` and compiling its patterns
    ///
    /// With `use_oracle` set and no oracle attached, every candidate is
    /// rejected.
    pub fn new(config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate()?;
        let classifier = LineClassifier::new(config.detection_variant, &config.lexicon)?;
        let filter = CandidateFilter::new(&config.lexicon)?;
        let gate = OracleGate::new(None, config.use_oracle);

        Ok(Self {
            config,
            classifier,
            filter,
            gate,
        })
    }

    /// Attach the validation oracle
    pub fn with_oracle(mut self, oracle: impl TransitionOracle + Send + Sync + 'static) -> Self {
        self.gate = OracleGate::new(Some(Box::new(oracle)), self.config.use_oracle);
        self
    }

    /// Active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Collect, filter, deduplicate, sample and validate transition phrases
    pub fn extract_transitions<S: AsRef<str>>(
        &self,
        texts: &[S],
    ) -> Result<TransitionReport, ExtractorError> {
        let start = Instant::now();
        let paragraphs = Paragraph::sequence(texts.iter().map(|t| t.as_ref()));

        let captured = self.capture_candidates(&paragraphs);
        let cleaned = self.filter.clean(&captured);
        let deduped = dedupe(&cleaned);
        debug!(
            "{} captured, {} after filtering, {} unique",
            captured.len(),
            cleaned.len(),
            deduped.unique.len()
        );

        let sampled = sample_seeded(&deduped.unique, self.config.sample_percent, self.config.seed)?;

        let mut oracle_calls = 0;
        let mut validated = Vec::with_capacity(sampled.len());
        for transition in &sampled {
            if self.gate.consults() {
                oracle_calls += 1;
            }
            if self.gate.validate(transition, None, None) {
                validated.push(transition.clone());
            }
        }
        if let Some(limit) = self.config.limit_total {
            validated.truncate(limit);
        }

        info!(
            "Extracted {} transitions from {} paragraphs ({} unique, {} sampled)",
            validated.len(),
            paragraphs.len(),
            deduped.unique.len(),
            sampled.len()
        );

        Ok(TransitionReport {
            paragraph_count: paragraphs.len(),
            captured: captured.len(),
            unique: deduped.unique,
            duplicates: deduped.duplicates,
            sampled,
            validated,
            oracle_calls,
            elapsed_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Build (context, transition, context) triples from paragraph texts
    pub fn extract_triples<S: AsRef<str>>(
        &self,
        texts: &[S],
    ) -> Result<TripleReport, ExtractorError> {
        let start = Instant::now();
        let paragraphs = Paragraph::sequence(texts.iter().map(|t| t.as_ref()));
        let strategy = self.config.effective_strategy();

        let builder = TripleBuilder::new(&self.classifier, &self.gate, BuildLimits::from(&self.config));
        let mut outcome = builder.build(&paragraphs, strategy);

        if let Some(limit) = self.config.limit_total {
            outcome.triples.truncate(limit);
        }

        Ok(TripleReport {
            triples: outcome.triples,
            stats: outcome.stats,
            strategy,
            paragraph_count: paragraphs.len(),
            elapsed_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Load a document and build its triples
    ///
    /// Loader failures are fatal for the run.
    pub fn process_document<D>(&self, loader: &D, bytes: &[u8]) -> Result<TripleReport, ExtractorError>
    where
        D: DocumentLoader + ?Sized,
        D::Error: std::fmt::Display,
    {
        let paragraphs = load_paragraphs(loader, bytes)?;
        self.extract_triples(&paragraphs)
    }

    /// Load a document and run the transition-list flow on it
    pub fn process_document_transitions<D>(
        &self,
        loader: &D,
        bytes: &[u8],
    ) -> Result<TransitionReport, ExtractorError>
    where
        D: DocumentLoader + ?Sized,
        D::Error: std::fmt::Display,
    {
        let paragraphs = load_paragraphs(loader, bytes)?;
        self.extract_transitions(&paragraphs)
    }

    /// Raw candidate lines for the transition-list flow
    ///
    /// Marker blocks capture every line until a header or `capture_cap`
    /// lines; shape checks are left to the filter. The other
    /// variants take each line their classifier marks as a candidate.
    fn capture_candidates(&self, paragraphs: &[Paragraph]) -> Vec<String> {
        if self.classifier.variant() != DetectionVariant::MarkerBlock {
            return paragraphs
                .iter()
                .filter(|p| {
                    self.classifier.classify_standalone(p.text()) == LineKind::TransitionCandidate
                })
                .map(|p| p.text().to_string())
                .collect();
        }

        let mut view = SequenceView::closed();
        let mut captured = Vec::new();
        for paragraph in paragraphs {
            let text = paragraph.text();
            if self.classifier.is_header(text) {
                view.close();
            } else if self.classifier.is_marker(text) {
                view.open();
            } else if view.is_capturing() {
                captured.push(text.to_string());
                if !view.record_capture(self.config.capture_cap) {
                    debug!(
                        "Capture cap {} reached at paragraph {}",
                        self.config.capture_cap,
                        paragraph.position()
                    );
                }
            }
        }
        captured
    }
}

fn load_paragraphs<D>(loader: &D, bytes: &[u8]) -> Result<Vec<String>, ExtractorError>
where
    D: DocumentLoader + ?Sized,
    D::Error: std::fmt::Display,
{
    loader
        .load(bytes)
        .map_err(|e| ExtractorError::Loader(e.to_string()))
}
