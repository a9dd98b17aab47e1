//! Scrivener LLM Provider Layer
//!
//! Pluggable implementations of the `LlmProvider` trait from
//! `scrivener-domain`, plus the plumbing every caller of a language model
//! needs: defensive response parsing and a bounded retry policy.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OllamaProvider`: Local Ollama API integration
//!
//! # Examples
//!
//! ```
//! use scrivener_llm::MockProvider;
//! use scrivener_domain::traits::LlmProvider;
//!
//! let provider = MockProvider::new("Hello from LLM!");
//! let result = provider.generate("test prompt").unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! ```

#![warn(missing_docs)]

pub mod ollama;
pub mod response;
pub mod retry;

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use scrivener_domain::traits::LlmProvider as LlmProviderTrait;
use thiserror::Error;

pub use ollama::OllamaProvider;
pub use retry::{generate_with_retry, RetryPolicy};

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

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Mock LLM provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls.
/// Responses can be scripted three ways, consulted in this order:
///
/// 1. A queue of responses consumed one per call (`push_response`), for
///    flows that issue several different calls in sequence
/// 2. Per-prompt responses (`add_response`)
/// 3. A fixed default for everything else
///
/// # Examples
///
/// ```
/// use scrivener_llm::MockProvider;
/// use scrivener_domain::traits::LlmProvider;
///
/// let mut provider = MockProvider::new("fallback");
/// provider.push_response("first call");
/// provider.push_response("second call");
///
/// assert_eq!(provider.generate("x").unwrap(), "first call");
/// assert_eq!(provider.generate("x").unwrap(), "second call");
/// assert_eq!(provider.generate("x").unwrap(), "fallback");
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    queued: Arc<Mutex<VecDeque<String>>>,
    responses: Arc<Mutex<HashMap<String, String>>>,
    call_count: Arc<Mutex<usize>>,
}

/// Sentinel a scripted response uses to force an error
const ERROR_SENTINEL: &str = "ERROR";

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            queued: Arc::new(Mutex::new(VecDeque::new())),
            responses: Arc::new(Mutex::new(HashMap::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Queue a response consumed by the next call, regardless of prompt
    pub fn push_response(&mut self, response: impl Into<String>) {
        self.queued.lock().unwrap().push_back(response.into());
    }

    /// Queue a failure consumed by the next call
    pub fn push_error(&mut self) {
        self.queued
            .lock()
            .unwrap()
            .push_back(ERROR_SENTINEL.to_string());
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(prompt.into(), response.into());
    }

    /// Configure to return an error for a specific prompt
    pub fn add_error(&mut self, prompt: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(prompt.into(), ERROR_SENTINEL.to_string());
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        *self.call_count.lock().unwrap() = 0;
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        *self.call_count.lock().unwrap() += 1;

        if let Some(response) = self.queued.lock().unwrap().pop_front() {
            if response == ERROR_SENTINEL {
                return Err(LlmError::Other("Mock error".to_string()));
            }
            return Ok(response);
        }

        let responses = self.responses.lock().unwrap();
        if let Some(response) = responses.get(prompt) {
            if response == ERROR_SENTINEL {
                return Err(LlmError::Other("Mock error".to_string()));
            }
            return Ok(response.clone());
        }

        Ok(self.default_response.clone())
    }
}
