//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur during extraction
///
/// An empty result is never an error: documents without markers, openers or
/// surviving candidates yield empty reports.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Document could not be loaded
    #[error("Loader error: {0}")]
    Loader(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A lexicon entry produced an invalid pattern
    #[error("Pattern error: {0}")]
    Pattern(String),

    /// Serialization of exported records failed
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ExtractorError {
    fn from(e: serde_json::Error) -> Self {
        ExtractorError::Serialization(e.to_string())
    }
}

impl From<regex::Error> for ExtractorError {
    fn from(e: regex::Error) -> Self {
        ExtractorError::Pattern(e.to_string())
    }
}
