//! .docx loader built on docx-rs
//!
//! A .docx file is a ZIP archive of WordprocessingML. docx-rs gives a typed
//! tree: Document → Paragraph → Run → Text. Each body paragraph becomes one
//! output paragraph; tables, images and headers/footers are ignored.

use crate::error::LoaderError;
use docx_rs::{DocumentChild, ParagraphChild, RunChild};
use segue_domain::DocumentLoader;
use tracing::debug;

/// Loads paragraphs from .docx bytes
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxLoader;

impl DocxLoader {
    /// Create a new loader
    pub fn new() -> Self {
        Self
    }
}

impl DocumentLoader for DocxLoader {
    type Error = LoaderError;

    fn load(&self, bytes: &[u8]) -> Result<Vec<String>, Self::Error> {
        let docx = docx_rs::read_docx(bytes).map_err(|e| LoaderError::Docx(e.to_string()))?;

        let mut paragraphs = Vec::new();
        let mut skipped = 0usize;

        for child in &docx.document.children {
            if let DocumentChild::Paragraph(para) = child {
                let mut text = String::new();
                collect_text(&para.children, &mut text);

                let trimmed = text.trim();
                if trimmed.is_empty() {
                    skipped += 1;
                } else {
                    paragraphs.push(trimmed.to_string());
                }
            }
        }

        debug!(
            "docx: {} paragraphs kept, {} empty skipped",
            paragraphs.len(),
            skipped
        );
        Ok(paragraphs)
    }
}

/// Concatenate run text, descending into hyperlinks. Tabs and breaks become
/// spaces so words on either side stay separate.
fn collect_text(children: &[ParagraphChild], out: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for rc in &run.children {
                    match rc {
                        RunChild::Text(t) => out.push_str(&t.text),
                        RunChild::Tab(_) | RunChild::Break(_) => out.push(' '),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => collect_text(&link.children, out),
            _ => {}
        }
    }
}
