//! Plain-text loader

use crate::error::LoaderError;
use segue_domain::DocumentLoader;

/// How paragraphs are delimited in a plain-text document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParagraphBreak {
    /// Every non-empty line is a paragraph
    #[default]
    Line,
    /// Paragraphs are separated by blank lines; inner newlines become spaces
    BlankLine,
}

/// Loads paragraphs from UTF-8 text
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextLoader {
    paragraph_break: ParagraphBreak,
}

impl PlainTextLoader {
    /// Create a loader with the given paragraph delimiting rule
    pub fn new(paragraph_break: ParagraphBreak) -> Self {
        Self { paragraph_break }
    }
}

impl DocumentLoader for PlainTextLoader {
    type Error = LoaderError;

    fn load(&self, bytes: &[u8]) -> Result<Vec<String>, Self::Error> {
        let text = std::str::from_utf8(bytes).map_err(|e| LoaderError::Encoding(e.to_string()))?;
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        let paragraphs = match self.paragraph_break {
            ParagraphBreak::Line => text
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect(),
            ParagraphBreak::BlankLine => {
                let mut paragraphs = Vec::new();
                let mut current: Vec<&str> = Vec::new();
                for line in text.lines() {
                    let line = line.trim();
                    if line.is_empty() {
                        if !current.is_empty() {
                            paragraphs.push(current.join(" "));
                            current.clear();
                        }
                    } else {
                        current.push(line);
                    }
                }
                if !current.is_empty() {
                    paragraphs.push(current.join(" "));
                }
                paragraphs
            }
        };

        Ok(paragraphs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_mode_trims_and_drops_empty() {
        let loader = PlainTextLoader::default();
        let paragraphs = loader.load(b"  Intro.  \n\n\t\nTransitions :\r\nEnfin,\n").unwrap();
        assert_eq!(paragraphs, vec!["Intro.", "Transitions :", "Enfin,"]);
    }

    #[test]
    fn test_blank_line_mode_joins_lines() {
        let loader = PlainTextLoader::new(ParagraphBreak::BlankLine);
        let paragraphs = loader
            .load(b"First line\nsame paragraph.\n\n\nSecond one.")
            .unwrap();
        assert_eq!(paragraphs, vec!["First line same paragraph.", "Second one."]);
    }

    #[test]
    fn test_strips_byte_order_mark() {
        let loader = PlainTextLoader::default();
        let paragraphs = loader.load("\u{feff}Enfin,".as_bytes()).unwrap();
        assert_eq!(paragraphs, vec!["Enfin,"]);
    }

    #[test]
    fn test_invalid_utf8() {
        let loader = PlainTextLoader::default();
        assert!(matches!(
            loader.load(&[0xff, 0xfe, 0x00]),
            Err(LoaderError::Encoding(_))
        ));
    }

    #[test]
    fn test_empty_document() {
        let loader = PlainTextLoader::default();
        assert!(loader.load(b"").unwrap().is_empty());
    }
}
