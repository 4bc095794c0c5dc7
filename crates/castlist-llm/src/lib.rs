//! Castlist LLM Provider Layer
//!
//! Implementations of the `CompletionClient` trait from `castlist-domain`.
//!
//! # Providers
//!
//! - `MockClient`: Deterministic mock for testing
//! - `OpenAiClient`: OpenAI responses API integration
//!
//! # Examples
//!
//! ```
//! use castlist_llm::MockClient;
//! use castlist_domain::traits::CompletionClient;
//!
//! let client = MockClient::new("Hello from LLM!");
//! let result = client.complete("test prompt").unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! ```

#![warn(missing_docs)]

pub mod openai;

use castlist_domain::traits::CompletionClient as CompletionClientTrait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use openai::OpenAiClient;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from the completion endpoint
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Model not available at the endpoint
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Mock completion client for deterministic testing
///
/// Returns pre-configured responses without making any network calls.
///
/// # Examples
///
/// ```
/// use castlist_llm::MockClient;
/// use castlist_domain::traits::CompletionClient;
///
/// // Simple fixed response
/// let client = MockClient::new("Fixed response");
/// assert_eq!(client.complete("any prompt").unwrap(), "Fixed response");
///
/// // Multiple responses
/// let mut client = MockClient::default();
/// client.add_response("prompt1", "response1");
/// client.add_response("prompt2", "response2");
/// assert_eq!(client.complete("prompt1").unwrap(), "response1");
/// assert_eq!(client.complete("prompt2").unwrap(), "response2");
/// ```
#[derive(Debug, Clone)]
pub struct MockClient {
    default_response: String,
    responses: Arc<Mutex<HashMap<String, String>>>,
    call_count: Arc<Mutex<usize>>,
    failure: Arc<Mutex<Option<String>>>,
}

impl MockClient {
    /// Create a new MockClient with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            call_count: Arc::new(Mutex::new(0)),
            failure: Arc::new(Mutex::new(None)),
        }
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(prompt.into(), response.into());
    }

    /// Make every subsequent call fail with the given message
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.lock().unwrap() = Some(message.into());
    }

    /// Get the number of times complete was called
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        *self.call_count.lock().unwrap() = 0;
    }
}

impl Default for MockClient {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl CompletionClientTrait for MockClient {
    type Error = LlmError;

    fn complete(&self, prompt: &str) -> Result<String, Self::Error> {
        *self.call_count.lock().unwrap() += 1;

        if let Some(message) = self.failure.lock().unwrap().as_ref() {
            return Err(LlmError::Communication(message.clone()));
        }

        let responses = self.responses.lock().unwrap();
        if let Some(response) = responses.get(prompt) {
            return Ok(response.clone());
        }

        Ok(self.default_response.clone())
    }
}
