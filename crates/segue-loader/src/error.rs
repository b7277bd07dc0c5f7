//! Error types for document loading

use thiserror::Error;

/// Errors that can occur while loading a document
///
/// Any of these is fatal for the document being loaded.
#[derive(Error, Debug)]
pub enum LoaderError {
    /// File could not be read
    #[error("I/O error: {0}")]
    Io(String),

    /// Bytes are not a readable .docx archive
    #[error("Invalid docx: {0}")]
    Docx(String),

    /// Text is not valid UTF-8
    #[error("Invalid text encoding: {0}")]
    Encoding(String),
}
