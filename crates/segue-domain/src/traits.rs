//! Trait definitions for external interactions
//!
//! These traits define the boundaries between extraction logic and
//! infrastructure. Implementations live in other crates.

/// Turns raw document bytes into ordered paragraphs
///
/// Implemented by the infrastructure layer (segue-loader). Implementations
/// must return non-empty, whitespace-trimmed paragraphs in document order.
pub trait DocumentLoader {
    /// Error type for load operations
    type Error;

    /// Load paragraphs from a raw document
    fn load(&self, bytes: &[u8]) -> Result<Vec<String>, Self::Error>;
}

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (segue-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate text completion
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Identifier of the model answering prompts
    fn model_id(&self) -> &str;
}

/// An external judge of whether a phrase is a genuine transition
///
/// `Ok(true)` is the only affirmative outcome. Any `Err` carries a
/// human-readable reason; callers decide how to degrade.
pub trait TransitionOracle {
    /// Judge a transition, optionally with its surrounding paragraphs
    fn judge(
        &self,
        transition: &str,
        context_a: Option<&str>,
        context_b: Option<&str>,
    ) -> Result<bool, String>;
}

impl<T: TransitionOracle + ?Sized> TransitionOracle for Box<T> {
    fn judge(
        &self,
        transition: &str,
        context_a: Option<&str>,
        context_b: Option<&str>,
    ) -> Result<bool, String> {
        (**self).judge(transition, context_a, context_b)
    }
}
