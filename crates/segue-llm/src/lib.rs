//! Segue LLM Provider Layer
//!
//! Pluggable LLM provider implementations behind the `LlmProvider` trait from
//! `segue-domain`. The extractor only ever sees the trait, so a run can use a
//! local model, a hosted chat-completions endpoint, or a deterministic mock.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OllamaProvider`: Local Ollama API integration
//! - `OpenAiCompatProvider`: Any `/v1/chat/completions` endpoint
//!
//! # Examples
//!
//! ```
//! use segue_llm::MockProvider;
//! use segue_domain::LlmProvider;
//!
//! let provider = MockProvider::new("Yes");
//! let result = provider.generate("Is 'Enfin,' a transition?").unwrap();
//! assert_eq!(result, "Yes");
//! ```

#![warn(missing_docs)]

pub mod ollama;
pub mod openai_compat;

use segue_domain::LlmProvider as LlmProviderTrait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

pub use ollama::OllamaProvider;
pub use openai_compat::OpenAiCompatProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Provider is missing required settings
    #[error("Not configured: {0}")]
    NotConfigured(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

enum MockReply {
    Text(String),
    Error,
}

/// Mock LLM provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls. A
/// response registered for a key is used when the prompt equals the key or,
/// failing that, contains it; keys are tried in registration order.
///
/// # Examples
///
/// ```
/// use segue_llm::MockProvider;
/// use segue_domain::LlmProvider;
///
/// let mut provider = MockProvider::new("No");
/// provider.add_response("Enfin,", "Yes");
/// assert_eq!(provider.generate("Phrase: \"Enfin,\"").unwrap(), "Yes");
/// assert_eq!(provider.generate("Phrase: \"Bonjour\"").unwrap(), "No");
/// ```
#[derive(Clone)]
pub struct MockProvider {
    default_response: Option<String>,
    responses: Arc<Mutex<Vec<(String, MockReply)>>>,
    call_count: Arc<Mutex<usize>>,
    model_id: String,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: Some(response.into()),
            responses: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
            model_id: "mock".to_string(),
        }
    }

    /// Create a provider whose every call fails
    pub fn failing() -> Self {
        Self {
            default_response: None,
            ..Self::new("")
        }
    }

    /// Set the reported model identifier
    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    /// Add a specific response for prompts matching `key`
    pub fn add_response(&mut self, key: impl Into<String>, response: impl Into<String>) {
        lock(&self.responses).push((key.into(), MockReply::Text(response.into())));
    }

    /// Configure to return an error for prompts matching `key`
    pub fn add_error(&mut self, key: impl Into<String>) {
        lock(&self.responses).push((key.into(), MockReply::Error));
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        *lock(&self.call_count)
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        *lock(&self.call_count) = 0;
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl std::fmt::Debug for MockProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockProvider")
            .field("model_id", &self.model_id)
            .field("call_count", &self.call_count())
            .finish()
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        *lock(&self.call_count) += 1;

        let responses = lock(&self.responses);
        let matched = responses
            .iter()
            .find(|(key, _)| key == prompt)
            .or_else(|| responses.iter().find(|(key, _)| prompt.contains(key.as_str())));

        match matched {
            Some((_, MockReply::Text(response))) => Ok(response.clone()),
            Some((_, MockReply::Error)) => Err(LlmError::Other("Mock error".to_string())),
            None => self
                .default_response
                .clone()
                .ok_or_else(|| LlmError::Communication("Mock provider unavailable".to_string())),
        }
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Build the single-threaded runtime providers use to drive async HTTP calls
/// from the synchronous `LlmProvider` interface.
pub(crate) fn blocking_runtime() -> Result<tokio::runtime::Runtime, LlmError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| LlmError::Other(format!("Failed to start runtime: {}", e)))
}
