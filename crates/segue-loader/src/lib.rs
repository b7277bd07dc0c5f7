//! Segue Document Loaders
//!
//! Turns raw document bytes into the ordered, non-empty, trimmed paragraph
//! sequence the extractor works on. Two formats are supported:
//!
//! - `.docx` word-processing documents via [`DocxLoader`]
//! - UTF-8 plain text via [`PlainTextLoader`]
//!
//! # Example Usage
//!
//! ```no_run
//! use segue_loader::load_file;
//!
//! let paragraphs = load_file("newsletter.docx")?;
//! println!("{} paragraphs", paragraphs.len());
//! # Ok::<(), segue_loader::LoaderError>(())
//! ```

#![warn(missing_docs)]

mod docx;
mod error;
mod text;

pub use docx::DocxLoader;
pub use error::LoaderError;
pub use text::{ParagraphBreak, PlainTextLoader};

use segue_domain::DocumentLoader;
use std::path::Path;
use tracing::info;

/// Pick a loader from the file extension
///
/// `.docx` (any case) selects [`DocxLoader`]; everything else is read as
/// line-separated plain text.
pub fn loader_for_path(path: &Path) -> Box<dyn DocumentLoader<Error = LoaderError>> {
    let is_docx = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("docx"))
        .unwrap_or(false);

    if is_docx {
        Box::new(DocxLoader::new())
    } else {
        Box::new(PlainTextLoader::default())
    }
}

/// Read a file from disk and load its paragraphs
pub fn load_file(path: impl AsRef<Path>) -> Result<Vec<String>, LoaderError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .map_err(|e| LoaderError::Io(format!("Cannot read '{}': {}", path.display(), e)))?;

    let paragraphs = loader_for_path(path).load(&bytes)?;
    info!("Loaded {} paragraphs from '{}'", paragraphs.len(), path.display());
    Ok(paragraphs)
}
