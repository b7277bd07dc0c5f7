//! Segue Extractor
//!
//! Finds short editorial transitions in a paragraph sequence and packages
//! each one with the paragraphs around it as a training triple.
//!
//! # Architecture
//!
//! ```text
//! paragraphs → LineClassifier → CandidateFilter → dedupe/sample
//!            → TripleBuilder (+ OracleGate) → exporters
//! ```
//!
//! Detection is heuristic only. One [`DetectionVariant`] is active per run:
//! marker blocks, an opener-phrase list, or line shape. The optional oracle
//! is injected through [`TransitionOracle`](segue_domain::TransitionOracle)
//! and fails closed.
//!
//! # Example Usage
//!
//! ```
//! use segue_extractor::{Extractor, ExtractorConfig};
//!
//! let extractor = Extractor::new(ExtractorConfig::default()).unwrap();
//! let report = extractor
//!     .extract_triples(&["Intro.", "Transitions :", "Enfin,", "Body one.", "Body two."])
//!     .unwrap();
//!
//! assert_eq!(report.triples.len(), 1);
//! assert_eq!(report.triples[0].transition, "Enfin,");
//! ```

#![warn(missing_docs)]

mod builder;
mod classifier;
mod config;
mod error;
mod export;
mod extractor;
mod filter;
mod normalize;
mod oracle;
mod prompt;
mod similarity;
mod types;

#[cfg(test)]
mod tests;

pub use builder::{split_inline, BuildLimits, BuildOutcome, BuildStats, TripleBuilder};
pub use classifier::{is_fragment_shaped, LineClassifier, LineKind, SequenceView};
pub use config::{
    DetectionVariant, ExtractorConfig, Lexicon, PairingStrategy, DEFAULT_SYSTEM_INSTRUCTION,
};
pub use error::ExtractorError;
pub use export::{duplicates_txt, fewshots_json, fine_tune_jsonl, transitions_txt, user_message};
pub use extractor::Extractor;
pub use filter::CandidateFilter;
pub use normalize::{dedupe, normalize, sample, sample_seeded, sample_size, Dedupe};
pub use oracle::{parse_answer, LlmOracle, OracleGate};
pub use prompt::PromptBuilder;
pub use similarity::token_overlap;
pub use types::{TransitionReport, TripleReport};
