//! Line classification heuristics
//!
//! Every paragraph is one of four kinds. Rules apply in priority order and
//! the first match wins:
//!
//! 1. header or garbage (date codes, boilerplate openers, very short lines)
//! 2. transition block marker (marker-block detection)
//! 3. transition candidate, per the active [`DetectionVariant`]
//! 4. body text

use crate::config::{DetectionVariant, Lexicon};
use crate::error::ExtractorError;
use crate::normalize::fold_lower;
use regex::Regex;
use segue_domain::Paragraph;
use tracing::trace;

/// Characters that end a full sentence
const TERMINAL_PUNCTUATION: [char; 4] = ['.', ':', '!', '?'];

/// Word bounds for shape-detected transitions
const SHAPE_MIN_WORDS: usize = 2;
const SHAPE_MAX_WORDS: usize = 10;

/// Longest line a marker block will capture, in words
const CAPTURE_MAX_WORDS: usize = 10;

/// Lines shorter than this (in characters) are headers
const MIN_LINE_CHARS: usize = 3;

/// What a paragraph is, structurally
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Section header or garbage; closes any open capture window
    Header,
    /// Opens a transition capture window
    TransitionMarker,
    /// A transition phrase candidate
    TransitionCandidate,
    /// Ordinary body text
    Body,
}

/// Capture-window state while walking a paragraph sequence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequenceView {
    capturing: bool,
    captured: usize,
}

impl SequenceView {
    /// A view with no capture window open
    pub fn closed() -> Self {
        Self::default()
    }

    /// Whether a capture window is open
    pub fn is_capturing(&self) -> bool {
        self.capturing
    }

    /// Lines captured since the window opened
    pub fn captured(&self) -> usize {
        self.captured
    }

    /// Open a fresh window
    pub fn open(&mut self) {
        self.capturing = true;
        self.captured = 0;
    }

    /// Close the current window
    pub fn close(&mut self) {
        self.capturing = false;
    }

    /// Count one captured line; closes the window once `cap` is reached.
    /// Returns `false` when this capture hit the cap.
    pub fn record_capture(&mut self, cap: usize) -> bool {
        self.captured += 1;
        if self.captured >= cap {
            self.capturing = false;
            return false;
        }
        true
    }
}

/// Classifies paragraphs for one detection variant
#[derive(Debug, Clone)]
pub struct LineClassifier {
    variant: DetectionVariant,
    date_header: Regex,
    boilerplate: Vec<String>,
    marker_keyword: String,
    openers: Vec<String>,
}

impl LineClassifier {
    /// Build a classifier, compiling the lexicon's patterns once
    pub fn new(variant: DetectionVariant, lexicon: &Lexicon) -> Result<Self, ExtractorError> {
        let prepositions = preposition_alternation(&lexicon.date_prepositions);
        let date_header = Regex::new(&format!(r"(?i)^\d+\s+(?:{})\s+\d{{2}}/\d{{2}}", prepositions))?;

        Ok(Self {
            variant,
            date_header,
            boilerplate: folded(&lexicon.boilerplate),
            marker_keyword: fold_lower(lexicon.marker_keyword.trim()),
            openers: folded(&lexicon.openers),
        })
    }

    /// Active detection variant
    pub fn variant(&self) -> DetectionVariant {
        self.variant
    }

    /// Known openers, lowercased
    pub fn openers(&self) -> &[String] {
        &self.openers
    }

    /// Classify a paragraph given the current capture-window state
    pub fn classify(&self, paragraph: &Paragraph, view: &SequenceView) -> LineKind {
        let kind = self.classify_line(paragraph.text(), view);
        trace!("paragraph {} classified as {:?}", paragraph.position(), kind);
        kind
    }

    /// Classify a bare line given the current capture-window state
    ///
    /// In marker-block detection a line is only a candidate while a window
    /// is open; the other variants ignore the view.
    pub fn classify_line(&self, line: &str, view: &SequenceView) -> LineKind {
        let line = line.trim();
        if self.is_header(line) {
            return LineKind::Header;
        }

        match self.variant {
            DetectionVariant::MarkerBlock => {
                if self.is_marker(line) {
                    LineKind::TransitionMarker
                } else if view.is_capturing() && is_capture_shaped(line) {
                    LineKind::TransitionCandidate
                } else {
                    LineKind::Body
                }
            }
            DetectionVariant::OpenerList | DetectionVariant::ShapeHeuristic => {
                if self.is_transition_like(line) {
                    LineKind::TransitionCandidate
                } else {
                    LineKind::Body
                }
            }
        }
    }

    /// Classify a line with no surrounding window state
    ///
    /// Marker-block lines that would be captured inside a window count as
    /// candidates here.
    pub fn classify_standalone(&self, line: &str) -> LineKind {
        let line = line.trim();
        if self.is_header(line) {
            LineKind::Header
        } else if self.variant == DetectionVariant::MarkerBlock && self.is_marker(line) {
            LineKind::TransitionMarker
        } else if self.is_transition_like(line) {
            LineKind::TransitionCandidate
        } else {
            LineKind::Body
        }
    }

    /// Stateless transition test for the active variant
    ///
    /// Used to keep transitions out of the context slots of a triple.
    pub fn is_transition_like(&self, line: &str) -> bool {
        let line = line.trim();
        match self.variant {
            DetectionVariant::MarkerBlock => is_capture_shaped(line),
            DetectionVariant::OpenerList => self.starts_with_opener(line),
            DetectionVariant::ShapeHeuristic => is_fragment_shaped(line),
        }
    }

    /// Rule 1: date-code headers, boilerplate openers, near-empty lines
    pub fn is_header(&self, line: &str) -> bool {
        let line = line.trim();
        if line.chars().count() < MIN_LINE_CHARS {
            return true;
        }
        if self.date_header.is_match(line) {
            return true;
        }
        let lower = fold_lower(line);
        self.boilerplate.iter().any(|b| lower.starts_with(b.as_str()))
    }

    /// Rule 2: line opens a transition block
    pub fn is_marker(&self, line: &str) -> bool {
        fold_lower(line.trim()).starts_with(self.marker_keyword.as_str())
    }

    /// Rule 3: line starts with a known opener phrase
    pub fn starts_with_opener(&self, line: &str) -> bool {
        let lower = fold_lower(line.trim());
        self.openers.iter().any(|o| lower.starts_with(o.as_str()))
    }
}

/// Rule 4: a short declarative fragment, 2 to 10 words, no sentence ending
pub fn is_fragment_shaped(line: &str) -> bool {
    let words = line.split_whitespace().count();
    (SHAPE_MIN_WORDS..=SHAPE_MAX_WORDS).contains(&words) && !ends_with_terminal(line)
}

/// A line a marker block keeps capturing: short, no sentence ending
fn is_capture_shaped(line: &str) -> bool {
    let words = line.split_whitespace().count();
    (1..=CAPTURE_MAX_WORDS).contains(&words) && !ends_with_terminal(line)
}

fn ends_with_terminal(line: &str) -> bool {
    line.trim_end().ends_with(TERMINAL_PUNCTUATION)
}

fn folded(entries: &[String]) -> Vec<String> {
    entries
        .iter()
        .map(|e| fold_lower(e.trim()))
        .filter(|e| !e.is_empty())
        .collect()
}

/// Regex alternation of escaped prepositions; falls back to "du"
pub(crate) fn preposition_alternation(prepositions: &[String]) -> String {
    let escaped: Vec<String> = prepositions
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(regex::escape)
        .collect();
    if escaped.is_empty() {
        "du".to_string()
    } else {
        escaped.join("|")
    }
}
