//! Triple building
//!
//! Walks a paragraph sequence once and emits (context, transition, context)
//! triples. Three pairing strategies share one acceptance path:
//!
//! 1. the transition is not contained in either context
//! 2. neither context looks like a transition itself
//! 3. the contexts overlap less than the similarity threshold
//! 4. the transition is under its usage cap
//! 5. the oracle gate agrees
//!
//! Accepted triples are never revisited. Building stops once `max_triples`
//! is reached and keeps what was accepted so far.

use crate::classifier::{LineClassifier, LineKind, SequenceView};
use crate::config::{DetectionVariant, ExtractorConfig, PairingStrategy};
use crate::normalize::{fold_lower, normalize};
use crate::oracle::OracleGate;
use crate::similarity::token_overlap;
use segue_domain::{Paragraph, Triple};
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use tracing::{debug, info};

/// Characters after which an inline opener starts a new segment
const SEGMENT_BOUNDARY: [char; 8] = ['.', '!', '?', ';', ':', '…', '»', '"'];

/// Numeric limits applied while building
#[derive(Debug, Clone, PartialEq)]
pub struct BuildLimits {
    /// Maximum triples per normalized transition
    pub usage_cap: usize,
    /// Context overlap at or above which a triple is discarded
    pub similarity_threshold: f64,
    /// Stop after this many accepted triples
    pub max_triples: Option<usize>,
    /// Lines captured per marker block
    pub capture_cap: usize,
    /// Split paragraphs at inline openers before sliding
    pub split_inline: bool,
}

impl From<&ExtractorConfig> for BuildLimits {
    fn from(config: &ExtractorConfig) -> Self {
        Self {
            usage_cap: config.usage_cap,
            similarity_threshold: config.similarity_threshold,
            max_triples: config.max_triples,
            capture_cap: config.capture_cap,
            split_inline: config.split_inline,
        }
    }
}

impl Default for BuildLimits {
    fn default() -> Self {
        Self::from(&ExtractorConfig::default())
    }
}

/// Counters describing one build
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    /// Candidate triples examined
    pub considered: usize,
    /// Triples accepted
    pub accepted: usize,
    /// Transition found verbatim inside a context
    pub rejected_self_reference: usize,
    /// A context looked like a transition
    pub rejected_transition_context: usize,
    /// Contexts too similar
    pub rejected_similarity: usize,
    /// Transition already used `usage_cap` times
    pub rejected_usage_cap: usize,
    /// Oracle said no or failed
    pub rejected_oracle: usize,
    /// Oracle consultations made
    pub oracle_calls: usize,
    /// Buffered transitions left without bodies to pair with
    pub dropped_pending: usize,
}

/// Triples and counters from one build
#[derive(Debug, Clone, Default)]
pub struct BuildOutcome {
    /// Accepted triples, in document order
    pub triples: Vec<Triple>,
    /// Build counters
    pub stats: BuildStats,
}

/// Single-use triple builder scoped to one document run
pub struct TripleBuilder<'a> {
    classifier: &'a LineClassifier,
    gate: &'a OracleGate,
    limits: BuildLimits,
    usage: HashMap<String, usize>,
    triples: Vec<Triple>,
    stats: BuildStats,
}

impl<'a> TripleBuilder<'a> {
    /// Create a builder
    pub fn new(classifier: &'a LineClassifier, gate: &'a OracleGate, limits: BuildLimits) -> Self {
        Self {
            classifier,
            gate,
            limits,
            usage: HashMap::new(),
            triples: Vec::new(),
            stats: BuildStats::default(),
        }
    }

    /// Build triples from `paragraphs` using `strategy`
    pub fn build(mut self, paragraphs: &[Paragraph], strategy: PairingStrategy) -> BuildOutcome {
        match strategy {
            PairingStrategy::Buffered => self.buffered(paragraphs),
            PairingStrategy::Sliding => {
                let sequence = self.sliding_sequence(paragraphs);
                self.sliding(&sequence);
            }
            PairingStrategy::Grouped => self.grouped(paragraphs),
        }

        info!(
            "Built {} triples from {} paragraphs ({:?}): {} considered, {} oracle calls",
            self.triples.len(),
            paragraphs.len(),
            strategy,
            self.stats.considered,
            self.stats.oracle_calls
        );

        BuildOutcome {
            triples: self.triples,
            stats: self.stats,
        }
    }

    fn is_full(&self) -> bool {
        self.limits
            .max_triples
            .is_some_and(|max| self.triples.len() >= max)
    }

    /// Buffered pairing: transitions captured after a marker queue up in
    /// document order; each body completing a two-body window consumes the
    /// oldest one. Transitions still queued at the end are dropped.
    fn buffered(&mut self, paragraphs: &[Paragraph]) {
        let mut view = SequenceView::closed();
        let mut window: VecDeque<&str> = VecDeque::with_capacity(2);
        let mut pending: VecDeque<&str> = VecDeque::new();

        for paragraph in paragraphs {
            if self.is_full() {
                break;
            }

            match self.classifier.classify(paragraph, &view) {
                LineKind::Header => view.close(),
                LineKind::TransitionMarker => view.open(),
                LineKind::TransitionCandidate => {
                    pending.push_back(paragraph.text());
                    if !view.record_capture(self.limits.capture_cap) {
                        debug!(
                            "Capture cap {} reached at paragraph {}",
                            self.limits.capture_cap,
                            paragraph.position()
                        );
                    }
                }
                LineKind::Body => {
                    view.close();
                    window.push_back(paragraph.text());
                    if window.len() > 2 {
                        window.pop_front();
                    }
                    if window.len() == 2 {
                        if let Some(transition) = pending.pop_front() {
                            let (a, b) = (window[0], window[1]);
                            self.consider(a, transition, b);
                            window.pop_front();
                        }
                    }
                }
            }
        }

        if !pending.is_empty() {
            debug!("Dropping {} unmatched transitions", pending.len());
        }
        self.stats.dropped_pending = pending.len();
    }

    /// Flat sequence for sliding, split at inline openers when enabled
    fn sliding_sequence(&self, paragraphs: &[Paragraph]) -> Vec<String> {
        let split = self.limits.split_inline
            && self.classifier.variant() == DetectionVariant::OpenerList;

        if split {
            paragraphs
                .iter()
                .flat_map(|p| split_inline(p.text(), self.classifier.openers()))
                .collect()
        } else {
            paragraphs.iter().map(|p| p.text().to_string()).collect()
        }
    }

    /// Sliding triples: every (i, i+1, i+2) window whose middle is a
    /// transition and whose ends are body text
    fn sliding(&mut self, sequence: &[String]) {
        for window in sequence.windows(3) {
            if self.is_full() {
                break;
            }

            let (a, transition, b) = (&window[0], &window[1], &window[2]);
            if self.classifier.classify_standalone(transition) != LineKind::TransitionCandidate {
                continue;
            }
            if self.is_structural(a) || self.is_structural(b) {
                continue;
            }
            self.consider(a, transition, b);
        }
    }

    /// Grouped pairing: bodies following a transition line form its group;
    /// adjacent bodies in a group become triples with that transition
    fn grouped(&mut self, paragraphs: &[Paragraph]) {
        let mut current: Option<&str> = None;
        let mut group: Vec<&str> = Vec::new();

        for paragraph in paragraphs {
            match self.classifier.classify_standalone(paragraph.text()) {
                LineKind::Header | LineKind::TransitionMarker => {}
                LineKind::TransitionCandidate => {
                    self.pair_group(current, &group);
                    current = Some(paragraph.text());
                    group.clear();
                }
                LineKind::Body => {
                    if current.is_some() {
                        group.push(paragraph.text());
                    }
                }
            }
        }
        self.pair_group(current, &group);
    }

    fn pair_group(&mut self, transition: Option<&str>, group: &[&str]) {
        let Some(transition) = transition else {
            return;
        };
        for pair in group.windows(2) {
            if self.is_full() {
                break;
            }
            self.consider(pair[0], transition, pair[1]);
        }
    }

    fn is_structural(&self, line: &str) -> bool {
        matches!(
            self.classifier.classify_standalone(line),
            LineKind::Header | LineKind::TransitionMarker
        )
    }

    /// Run one candidate through the acceptance checks
    fn consider(&mut self, a: &str, transition: &str, b: &str) -> bool {
        self.stats.considered += 1;
        let triple = Triple::new(a, transition, b);

        if triple.transition_in_context() {
            debug!("Rejected '{}': contained in a context", transition);
            self.stats.rejected_self_reference += 1;
            return false;
        }

        if self.classifier.is_transition_like(a) || self.classifier.is_transition_like(b) {
            debug!("Rejected '{}': context looks like a transition", transition);
            self.stats.rejected_transition_context += 1;
            return false;
        }

        let overlap = token_overlap(a, b);
        if overlap >= self.limits.similarity_threshold {
            debug!("Rejected '{}': contexts overlap {:.2}", transition, overlap);
            self.stats.rejected_similarity += 1;
            return false;
        }

        let key = normalize(transition);
        let used = self.usage.get(&key).copied().unwrap_or(0);
        if used >= self.limits.usage_cap {
            debug!("Rejected '{}': usage cap {} reached", transition, self.limits.usage_cap);
            self.stats.rejected_usage_cap += 1;
            return false;
        }

        if self.gate.consults() {
            self.stats.oracle_calls += 1;
        }
        if !self.gate.validate(transition, Some(a), Some(b)) {
            self.stats.rejected_oracle += 1;
            return false;
        }

        *self.usage.entry(key).or_insert(0) += 1;
        self.triples.push(triple);
        self.stats.accepted += 1;
        true
    }
}

/// Split a paragraph where inline transition openers begin
///
/// An opener starts a new segment when it follows a sentence boundary; the
/// opener stays at the start of its segment. `openers` must be lowercased.
///
/// # Examples
///
/// ```
/// use segue_extractor::split_inline;
///
/// let openers = vec!["enfin".to_string()];
/// let segments = split_inline("Le match est fini. Enfin, la météo.", &openers);
/// assert_eq!(segments, vec!["Le match est fini.", "Enfin, la météo."]);
/// ```
pub fn split_inline(text: &str, openers: &[String]) -> Vec<String> {
    let mut cuts = Vec::new();
    let mut last_non_space: Option<char> = None;
    let mut prev: Option<char> = None;

    for (byte, c) in text.char_indices() {
        let at_boundary = matches!(prev, Some(p) if p.is_whitespace())
            && matches!(last_non_space, Some(l) if SEGMENT_BOUNDARY.contains(&l));
        if at_boundary && openers.iter().any(|o| starts_with_folded(&text[byte..], o)) {
            cuts.push(byte);
        }

        if !c.is_whitespace() {
            last_non_space = Some(c);
        }
        prev = Some(c);
    }

    let mut segments = Vec::with_capacity(cuts.len() + 1);
    let mut start = 0;
    for cut in cuts.into_iter().chain(std::iter::once(text.len())) {
        let segment = text[start..cut].trim();
        if !segment.is_empty() {
            segments.push(segment.to_string());
        }
        start = cut;
    }
    segments
}

fn starts_with_folded(text: &str, opener: &str) -> bool {
    let len = opener.chars().count();
    if len == 0 {
        return false;
    }
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(len).collect();
    if fold_lower(&head) != opener {
        return false;
    }
    // the opener must end on a word boundary
    let word_end = opener.chars().last().is_some_and(char::is_alphanumeric);
    !word_end || chars.next().map_or(true, |c| !c.is_alphanumeric())
}
