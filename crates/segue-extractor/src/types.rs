//! Report types returned by the extractor

use crate::builder::BuildStats;
use crate::config::PairingStrategy;
use segue_domain::{DuplicateEntry, Triple};

/// Outcome of the transition-list flow
#[derive(Debug, Clone, Default)]
pub struct TransitionReport {
    /// Paragraphs read from the document
    pub paragraph_count: usize,

    /// Raw lines captured as candidates, before filtering
    pub captured: usize,

    /// Filtered candidates, unique by normalized form, first-seen order
    pub unique: Vec<String>,

    /// Candidates seen more than once
    pub duplicates: Vec<DuplicateEntry>,

    /// Subset of `unique` kept by sampling
    pub sampled: Vec<String>,

    /// Sampled transitions the oracle gate accepted, truncated to `limit_total`
    pub validated: Vec<String>,

    /// Oracle consultations made
    pub oracle_calls: usize,

    /// Wall time of the run
    pub elapsed_ms: u64,
}

impl TransitionReport {
    /// Whether the run produced no transitions
    pub fn is_empty(&self) -> bool {
        self.validated.is_empty()
    }
}

/// Outcome of the triple flow
#[derive(Debug, Clone)]
pub struct TripleReport {
    /// Accepted triples, truncated to `limit_total`
    pub triples: Vec<Triple>,

    /// Build counters
    pub stats: BuildStats,

    /// Strategy that paired the triples
    pub strategy: PairingStrategy,

    /// Paragraphs read from the document
    pub paragraph_count: usize,

    /// Wall time of the run
    pub elapsed_ms: u64,
}

impl TripleReport {
    /// Oracle consultations made
    pub fn oracle_calls(&self) -> usize {
        self.stats.oracle_calls
    }

    /// Whether the run produced no triples
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }
}
