//! Validation oracle seam
//!
//! The oracle is an optional, fallible collaborator. [`LlmOracle`] adapts any
//! `LlmProvider` into a [`TransitionOracle`]; [`OracleGate`] is what the
//! extraction core talks to, and it collapses every failure to a rejection.

use crate::prompt::PromptBuilder;
use segue_domain::{LlmProvider, TransitionOracle};
use std::fmt::Display;
use tracing::{debug, warn};

/// Answers counted as affirmative, after trimming and lowercasing
const AFFIRMATIVE: [&str; 2] = ["yes", "oui"];

/// Answers counted as negative
const NEGATIVE: [&str; 2] = ["no", "non"];

/// A [`TransitionOracle`] backed by an LLM yes/no question
pub struct LlmOracle<L> {
    provider: L,
}

impl<L> LlmOracle<L>
where
    L: LlmProvider,
    L::Error: Display,
{
    /// Wrap a provider
    pub fn new(provider: L) -> Self {
        Self { provider }
    }

    /// The wrapped provider
    pub fn provider(&self) -> &L {
        &self.provider
    }
}

impl<L> TransitionOracle for LlmOracle<L>
where
    L: LlmProvider,
    L::Error: Display,
{
    fn judge(
        &self,
        transition: &str,
        context_a: Option<&str>,
        context_b: Option<&str>,
    ) -> Result<bool, String> {
        let prompt = PromptBuilder::new(transition)
            .with_context(context_a, context_b)
            .build();

        let response = self
            .provider
            .generate(&prompt)
            .map_err(|e| format!("{} failed: {}", self.provider.model_id(), e))?;

        parse_answer(&response)
    }
}

/// Interpret a model answer
///
/// Quotes, surrounding whitespace and trailing punctuation are ignored.
/// Anything other than a clear yes or no is an error.
pub fn parse_answer(response: &str) -> Result<bool, String> {
    let answer = response
        .trim()
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '`' || c.is_whitespace())
        .trim_end_matches(['.', '!'])
        .to_lowercase();

    if AFFIRMATIVE.contains(&answer.as_str()) {
        Ok(true)
    } else if NEGATIVE.contains(&answer.as_str()) {
        Ok(false)
    } else {
        Err(format!("unrecognized answer: {:?}", response.trim()))
    }
}

/// Fail-closed front for an optional oracle
///
/// - disabled: every candidate passes and the oracle is never called
/// - enabled without an oracle: every candidate is rejected
/// - enabled: only `Ok(true)` passes; errors are logged and reject
pub struct OracleGate {
    oracle: Option<Box<dyn TransitionOracle + Send + Sync>>,
    enabled: bool,
}

impl OracleGate {
    /// A gate that accepts everything without consulting anyone
    pub fn disabled() -> Self {
        Self {
            oracle: None,
            enabled: false,
        }
    }

    /// A gate consulting `oracle` when `enabled`
    pub fn new(oracle: Option<Box<dyn TransitionOracle + Send + Sync>>, enabled: bool) -> Self {
        Self { oracle, enabled }
    }

    /// Whether validation calls will be made
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether an oracle is attached
    pub fn has_oracle(&self) -> bool {
        self.oracle.is_some()
    }

    /// Whether [`validate`](Self::validate) will actually call the oracle
    pub fn consults(&self) -> bool {
        self.enabled && self.oracle.is_some()
    }

    /// Validate a transition; never fails, see the type docs for the policy
    pub fn validate(
        &self,
        transition: &str,
        context_a: Option<&str>,
        context_b: Option<&str>,
    ) -> bool {
        if !self.enabled {
            return true;
        }

        let Some(oracle) = self.oracle.as_ref() else {
            warn!("Oracle enabled but none attached, rejecting '{}'", transition);
            return false;
        };

        match oracle.judge(transition, context_a, context_b) {
            Ok(verdict) => {
                debug!("Oracle verdict for '{}': {}", transition, verdict);
                verdict
            }
            Err(reason) => {
                warn!("Oracle validation failed for '{}': {}", transition, reason);
                false
            }
        }
    }
}

impl Default for OracleGate {
    fn default() -> Self {
        Self::disabled()
    }
}

impl std::fmt::Debug for OracleGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OracleGate")
            .field("enabled", &self.enabled)
            .field("has_oracle", &self.has_oracle())
            .finish()
    }
}
