//! Candidate filter for captured transition lines

use crate::classifier::preposition_alternation;
use crate::config::Lexicon;
use crate::error::ExtractorError;
use regex::Regex;
use tracing::debug;

/// Word bounds for an accepted candidate
const MIN_WORDS: usize = 2;
const MAX_WORDS: usize = 7;

/// Leading list decorations removed before measuring a candidate
const LIST_MARKERS: [char; 8] = ['•', '–', '-', '—', '*', '·', '.', ')'];

/// Accepts or rejects transition candidates by shape
#[derive(Debug, Clone)]
pub struct CandidateFilter {
    date_code: Regex,
    preposition_lead: Regex,
}

impl CandidateFilter {
    /// Build a filter for the lexicon's date prepositions
    pub fn new(lexicon: &Lexicon) -> Result<Self, ExtractorError> {
        let prepositions = preposition_alternation(&lexicon.date_prepositions);
        Ok(Self {
            date_code: Regex::new(&format!(r"(?i)^(?:{})\s+\d{{2}}/?", prepositions))?,
            preposition_lead: Regex::new(&format!(r"(?i)^(?:{})(?:\s|$)", prepositions))?,
        })
    }

    /// Remove leading bullets, ordinals and spaces
    ///
    /// # Examples
    ///
    /// ```
    /// use segue_extractor::CandidateFilter;
    ///
    /// assert_eq!(CandidateFilter::strip_markers("• 2. Pour finir"), "Pour finir");
    /// ```
    pub fn strip_markers(candidate: &str) -> &str {
        candidate
            .trim_start_matches(|c: char| {
                c.is_whitespace() || c.is_ascii_digit() || LIST_MARKERS.contains(&c)
            })
            .trim_end()
    }

    /// Whether a candidate survives the shape checks
    pub fn accept(&self, candidate: &str) -> bool {
        let stripped = Self::strip_markers(candidate);

        let words = stripped.split_whitespace().count();
        if !(MIN_WORDS..=MAX_WORDS).contains(&words) {
            debug!("Filtered '{}': {} words", candidate, words);
            return false;
        }

        if self.is_date_code(stripped) {
            debug!("Filtered '{}': date code", candidate);
            return false;
        }

        true
    }

    /// Stripped forms of the accepted candidates, in input order
    pub fn clean<S: AsRef<str>>(&self, candidates: &[S]) -> Vec<String> {
        candidates
            .iter()
            .map(AsRef::as_ref)
            .filter(|c| self.accept(c))
            .map(|c| Self::strip_markers(c).to_string())
            .collect()
    }

    fn is_date_code(&self, text: &str) -> bool {
        self.date_code.is_match(text) || (self.preposition_lead.is_match(text) && text.contains('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> CandidateFilter {
        CandidateFilter::new(&Lexicon::default()).unwrap()
    }

    #[test]
    fn test_rejects_date_code() {
        let filter = filter();
        assert!(!filter.accept("Du 12/03"));
        assert!(!filter.accept("du 12 mars"));
        assert!(!filter.accept("Du lundi au 14/05"));
    }

    #[test]
    fn test_preposition_alone_is_not_a_date() {
        assert!(filter().accept("Du côté de la culture"));
    }

    #[test]
    fn test_word_bounds() {
        let filter = filter();
        assert!(!filter.accept("Enfin,"));
        assert!(filter.accept("Pour finir"));
        assert!(filter.accept("Un deux trois quatre cinq six sept"));
        assert!(!filter.accept("Un deux trois quatre cinq six sept huit"));
    }

    #[test]
    fn test_markers_stripped_before_counting() {
        let filter = filter();
        assert!(!filter.accept("- 1. Enfin,"));
        assert!(filter.accept("• Place au sport"));
    }

    #[test]
    fn test_strip_markers() {
        assert_eq!(CandidateFilter::strip_markers("  — Sans transition"), "Sans transition");
        assert_eq!(CandidateFilter::strip_markers("3) Côté météo"), "Côté météo");
        assert_eq!(CandidateFilter::strip_markers("Enfin"), "Enfin");
        assert_eq!(CandidateFilter::strip_markers("•••"), "");
    }

    #[test]
    fn test_clean_keeps_order() {
        let cleaned = filter().clean(&["• Place au sport", "Enfin,", "2. Côté météo", "Du 12/03"]);
        assert_eq!(cleaned, vec!["Place au sport", "Côté météo"]);
    }

    #[test]
    fn test_custom_prepositions() {
        let lexicon = Lexicon {
            date_prepositions: vec!["of".to_string(), "on".to_string()],
            ..Lexicon::default()
        };
        let filter = CandidateFilter::new(&lexicon).unwrap();
        assert!(!filter.accept("On 12/03"));
        assert!(filter.accept("Du 12/03 au soir"));
    }
}
