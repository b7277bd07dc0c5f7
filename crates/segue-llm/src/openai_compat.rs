//! OpenAI-compatible chat completions provider
//!
//! Talks to any endpoint exposing `/v1/chat/completions`. The API key is read
//! from an environment variable so it never lands in config files.

use crate::ollama::DEFAULT_MAX_RETRIES;
use crate::{blocking_runtime, LlmError};
use segue_domain::LlmProvider as LlmProviderTrait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Default environment variable holding the API key
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Provider for OpenAI-style chat completion APIs
pub struct OpenAiCompatProvider {
    client: reqwest::Client,
    runtime: tokio::runtime::Runtime,
    base_url: String,
    api_key: Option<String>,
    model: String,
    max_retries: u32,
}

#[derive(Debug, Clone, Serialize)]
struct ChatCompletionsRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f64,
    stream: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatCompletionsResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
struct Choice {
    message: Message,
}

impl OpenAiCompatProvider {
    /// Create a provider with an explicit key
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Communication(format!("Failed to build client: {}", e)))?;

        Ok(Self {
            client,
            runtime: blocking_runtime()?,
            base_url: base_url.into(),
            api_key,
            model: model.into(),
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Create a provider reading its key from `key_env`
    ///
    /// # Errors
    ///
    /// Returns `LlmError::NotConfigured` when the variable is unset or blank.
    pub fn from_env(
        base_url: impl Into<String>,
        model: impl Into<String>,
        key_env: &str,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let api_key = std::env::var(key_env)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| LlmError::NotConfigured(format!("missing {}", key_env)))?;
        Self::new(base_url, model, Some(api_key), timeout)
    }

    /// Set the maximum number of attempts per request
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    fn endpoint_chat_completions(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'))
    }

    /// Send a single user message and return the first choice's content
    ///
    /// Transport failures and non-success statuses are retried with
    /// exponential backoff up to the configured attempt count. A missing
    /// model or an unparseable body fails immediately.
    pub async fn chat(&self, user: &str) -> Result<String, LlmError> {
        let req = ChatCompletionsRequest {
            model: self.model.clone(),
            messages: vec![Message {
                role: "user".to_string(),
                content: user.to_string(),
            }],
            temperature: 0.0,
            stream: false,
        };

        let mut attempts = 0;
        loop {
            attempts += 1;
            match self.send(&req).await {
                Err(LlmError::Communication(reason)) if attempts < self.max_retries => {
                    // Exponential backoff: 1s, 2s, 4s, etc.
                    let delay = Duration::from_secs(2u64.pow(attempts - 1));
                    debug!(
                        "chat.completions attempt {} failed ({}), retrying in {:?}",
                        attempts, reason, delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(LlmError::Communication(reason)) => {
                    return Err(LlmError::Communication(format!(
                        "{} (after {} attempts)",
                        reason, attempts
                    )));
                }
                other => return other,
            }
        }
    }

    async fn send(&self, req: &ChatCompletionsRequest) -> Result<String, LlmError> {
        let mut rb = self
            .client
            .post(self.endpoint_chat_completions())
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(k) = &self.api_key {
            rb = rb.header(reqwest::header::AUTHORIZATION, format!("Bearer {k}"));
        }

        let resp = rb
            .json(req)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;
        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotAvailable(self.model.clone()));
        }
        if !status.is_success() {
            return Err(LlmError::Communication(format!(
                "chat.completions HTTP {status}"
            )));
        }

        let parsed: ChatCompletionsResponse = resp
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("no choices in response".to_string()))
    }
}

impl LlmProviderTrait for OpenAiCompatProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        self.runtime.block_on(self.chat(prompt))
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}
