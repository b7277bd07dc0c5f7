//! Paragraph - one positioned block of document text

use std::fmt;

/// An ordered, immutable block of text produced by a document loader
///
/// Position is 0-indexed and reflects document order, which is the only
/// structural signal the extractor relies on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Paragraph {
    position: usize,
    text: String,
}

impl Paragraph {
    /// Create a paragraph at the given position
    pub fn new(position: usize, text: impl Into<String>) -> Self {
        Self {
            position,
            text: text.into(),
        }
    }

    /// Number a sequence of texts in order
    ///
    /// # Examples
    ///
    /// ```
    /// use segue_domain::Paragraph;
    ///
    /// let paragraphs = Paragraph::sequence(["Intro.", "Body."]);
    /// assert_eq!(paragraphs[1].position(), 1);
    /// assert_eq!(paragraphs[1].text(), "Body.");
    /// ```
    pub fn sequence<I, S>(texts: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        texts
            .into_iter()
            .enumerate()
            .map(|(position, text)| Self::new(position, text))
            .collect()
    }

    /// Position in the source document
    pub fn position(&self) -> usize {
        self.position
    }

    /// Text content
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of whitespace-separated words
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

impl fmt::Display for Paragraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.position, self.text)
    }
}
