//! Segue Domain Layer
//!
//! Value types and trait seams shared by every other segue crate. This crate
//! has no third-party runtime dependencies; infrastructure (document parsing,
//! model backends) lives in other crates and plugs in through [`traits`].
//!
//! ## Key Concepts
//!
//! - **Paragraph**: one ordered, non-empty block of text from a document
//! - **Transition**: a short phrase linking two paragraphs
//! - **Triple**: context before, transition, context after
//! - **Oracle**: an optional, fallible judge of transition validity

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod paragraph;
pub mod traits;
pub mod triple;

// Re-exports for convenience
pub use paragraph::Paragraph;
pub use traits::{DocumentLoader, LlmProvider, TransitionOracle};
pub use triple::{DuplicateEntry, Triple};
