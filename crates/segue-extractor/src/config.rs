//! Configuration for the Extractor

use crate::error::ExtractorError;
use serde::{Deserialize, Serialize};

/// Default fine-tuning system instruction
pub const DEFAULT_SYSTEM_INSTRUCTION: &str =
    "Insert a short, contextual transition between the two paragraphs.";

/// How transition lines are recognised in a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DetectionVariant {
    /// Transitions are listed in a block after a marker line
    #[default]
    MarkerBlock,
    /// Transitions are interleaved with body text and start with a known opener
    OpenerList,
    /// Transitions are short fragments without terminal punctuation
    ShapeHeuristic,
}

impl DetectionVariant {
    /// Pairing strategy that matches this document shape
    pub fn default_strategy(self) -> PairingStrategy {
        match self {
            DetectionVariant::MarkerBlock => PairingStrategy::Buffered,
            DetectionVariant::OpenerList | DetectionVariant::ShapeHeuristic => {
                PairingStrategy::Sliding
            }
        }
    }
}

/// How transitions are paired with surrounding paragraphs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PairingStrategy {
    /// Queue transitions from marker blocks, pair them with the next bodies
    Buffered,
    /// Look at every window of three consecutive paragraphs
    Sliding,
    /// Group bodies under the last transition line, pair adjacent bodies
    Grouped,
}

/// Language-specific vocabulary used by the heuristics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lexicon {
    /// Keyword opening a transition block (matched as a lowercase prefix)
    pub marker_keyword: String,

    /// Known transition openers (matched as lowercase prefixes)
    pub openers: Vec<String>,

    /// Boilerplate section openers treated as headers
    pub boilerplate: Vec<String>,

    /// Two-letter prepositions that introduce date codes ("du 12/03")
    pub date_prepositions: Vec<String>,
}

impl Default for Lexicon {
    /// French editorial defaults
    fn default() -> Self {
        Self {
            marker_keyword: "transitions".to_string(),
            openers: [
                "enfin",
                "dans l'actualité",
                "dans un autre registre",
                "et pour finir",
                "à noter que",
                "signalons que",
                "sachez que",
                "pour finir",
                "d'autre part",
                "tournons-nous",
                "partons à",
                "nous vous rappelons",
                "et pour terminer",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            boilerplate: vec!["à savoir également".to_string()],
            date_prepositions: vec!["du".to_string()],
        }
    }
}

/// Configuration for the Extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Which transition detector is active
    pub detection_variant: DetectionVariant,

    /// Pairing strategy override; `None` uses the variant's default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<PairingStrategy>,

    /// Consult the validation oracle
    pub use_oracle: bool,

    /// Model identifier handed to the oracle backend, never interpreted here
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oracle_model_id: Option<String>,

    /// Share of unique transitions (1-100) kept before oracle validation
    pub sample_percent: u8,

    /// Maximum triples sharing one normalized transition
    pub usage_cap: usize,

    /// Token overlap at or above which two contexts are degenerate
    pub similarity_threshold: f64,

    /// Stop building once this many triples are accepted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_triples: Option<usize>,

    /// Truncate final output to this many records
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_total: Option<usize>,

    /// Lines captured per marker block before the window closes
    pub capture_cap: usize,

    /// Split paragraphs at inline openers (opener-list detection only)
    pub split_inline: bool,

    /// Seed for candidate sampling; `None` draws from entropy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// System message for fine-tuning records; empty omits it
    pub system_instruction: String,

    /// Vocabulary used by the heuristics
    pub lexicon: Lexicon,
}

impl ExtractorConfig {
    /// Strategy actually used for pairing
    pub fn effective_strategy(&self) -> PairingStrategy {
        self.strategy
            .unwrap_or_else(|| self.detection_variant.default_strategy())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ExtractorError> {
        if self.usage_cap == 0 {
            return Err(ExtractorError::Config(
                "usage_cap must be greater than 0".to_string(),
            ));
        }
        if !(self.similarity_threshold > 0.0 && self.similarity_threshold <= 1.0) {
            return Err(ExtractorError::Config(format!(
                "similarity_threshold {} out of range (0.0, 1.0]",
                self.similarity_threshold
            )));
        }
        if !(1..=100).contains(&self.sample_percent) {
            return Err(ExtractorError::Config(format!(
                "sample_percent {} out of range [1, 100]",
                self.sample_percent
            )));
        }
        if self.max_triples == Some(0) {
            return Err(ExtractorError::Config(
                "max_triples must be greater than 0 when set".to_string(),
            ));
        }
        if self.capture_cap == 0 {
            return Err(ExtractorError::Config(
                "capture_cap must be greater than 0".to_string(),
            ));
        }
        if self.lexicon.marker_keyword.trim().is_empty() {
            return Err(ExtractorError::Config(
                "lexicon.marker_keyword cannot be empty".to_string(),
            ));
        }
        if self.detection_variant == DetectionVariant::OpenerList
            && self.lexicon.openers.iter().all(|o| o.trim().is_empty())
        {
            return Err(ExtractorError::Config(
                "opener-list detection needs at least one opener".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ExtractorError> {
        toml::from_str(toml_str)
            .map_err(|e| ExtractorError::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ExtractorError> {
        toml::to_string_pretty(self)
            .map_err(|e| ExtractorError::Config(format!("Failed to serialize to TOML: {}", e)))
    }
}

impl Default for ExtractorConfig {
    /// Default configuration: marker blocks, no oracle, cap of 3 per transition
    fn default() -> Self {
        Self {
            detection_variant: DetectionVariant::MarkerBlock,
            strategy: None,
            use_oracle: false,
            oracle_model_id: None,
            sample_percent: 100,
            usage_cap: 3,
            similarity_threshold: 0.8,
            max_triples: None,
            limit_total: None,
            capture_cap: 200,
            split_inline: true,
            seed: None,
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.to_string(),
            lexicon: Lexicon::default(),
        }
    }
}

impl ExtractorConfig {
    /// Validating preset: oracle on, every unique candidate checked
    pub fn validating(model_id: impl Into<String>) -> Self {
        Self {
            use_oracle: true,
            oracle_model_id: Some(model_id.into()),
            ..Self::default()
        }
    }

    /// Strict preset: each transition used once, contexts must differ more
    pub fn strict() -> Self {
        Self {
            usage_cap: 1,
            similarity_threshold: 0.6,
            capture_cap: 50,
            ..Self::default()
        }
    }

    /// Lenient preset: more reuse, near-duplicate contexts tolerated
    pub fn lenient() -> Self {
        Self {
            usage_cap: 5,
            similarity_threshold: 0.95,
            capture_cap: 500,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.usage_cap, 3);
        assert_eq!(config.similarity_threshold, 0.8);
        assert!(!config.use_oracle);
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(ExtractorConfig::strict().validate().is_ok());
        assert!(ExtractorConfig::lenient().validate().is_ok());

        let validating = ExtractorConfig::validating("gpt-4");
        assert!(validating.validate().is_ok());
        assert!(validating.use_oracle);
        assert_eq!(validating.oracle_model_id.as_deref(), Some("gpt-4"));
    }

    #[test]
    fn test_invalid_usage_cap() {
        let mut config = ExtractorConfig::default();
        config.usage_cap = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_similarity_threshold() {
        let mut config = ExtractorConfig::default();
        config.similarity_threshold = 0.0;
        assert!(config.validate().is_err());
        config.similarity_threshold = 1.5;
        assert!(config.validate().is_err());
        config.similarity_threshold = 1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_sample_percent() {
        let mut config = ExtractorConfig::default();
        config.sample_percent = 0;
        assert!(config.validate().is_err());
        config.sample_percent = 101;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_max_triples_rejected() {
        let mut config = ExtractorConfig::default();
        config.max_triples = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_opener_list_needs_openers() {
        let mut config = ExtractorConfig::default();
        config.detection_variant = DetectionVariant::OpenerList;
        config.lexicon.openers.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_effective_strategy() {
        let mut config = ExtractorConfig::default();
        assert_eq!(config.effective_strategy(), PairingStrategy::Buffered);

        config.detection_variant = DetectionVariant::ShapeHeuristic;
        assert_eq!(config.effective_strategy(), PairingStrategy::Sliding);

        config.strategy = Some(PairingStrategy::Grouped);
        assert_eq!(config.effective_strategy(), PairingStrategy::Grouped);
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = ExtractorConfig::default();
        config.max_triples = Some(10);
        config.seed = Some(7);
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();

        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed = ExtractorConfig::from_toml(
            r#"
            detection_variant = "opener-list"
            usage_cap = 2
            "#,
        )
        .unwrap();

        assert_eq!(parsed.detection_variant, DetectionVariant::OpenerList);
        assert_eq!(parsed.usage_cap, 2);
        assert_eq!(parsed.similarity_threshold, 0.8);
        assert_eq!(parsed.lexicon, Lexicon::default());
    }

    #[test]
    fn test_unknown_variant_rejected() {
        assert!(ExtractorConfig::from_toml(r#"detection_variant = "psychic""#).is_err());
    }
}
