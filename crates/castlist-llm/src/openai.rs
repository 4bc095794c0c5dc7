//! OpenAI Client Implementation
//!
//! Integration with the OpenAI responses API for actor data extraction.
//!
//! # Features
//!
//! - Async HTTP communication with the responses endpoint
//! - Configurable endpoint, model, and API key
//! - Tolerant response-shape handling (structured output list,
//!   `output_text`, and legacy `choices` fallbacks)
//! - Timeout handling
//!
//! # Examples
//!
//! ```no_run
//! use castlist_llm::OpenAiClient;
//!
//! let client = OpenAiClient::new("https://api.openai.com", "sk-...", "gpt-5");
//!
//! // Note: the complete method is async, so you need to use it in an
//! // async context or use the CompletionClient trait's sync wrapper
//! ```

use crate::LlmError;
use castlist_domain::traits::CompletionClient as CompletionClientTrait;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Default API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com";

/// Default timeout for completion requests (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Client for the OpenAI responses API
///
/// Each call to `complete` makes exactly one outbound request; there is
/// no retry, and failures propagate to the caller.
pub struct OpenAiClient {
    endpoint: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

/// Request body for the responses API
#[derive(Serialize)]
struct ResponsesRequest {
    model: String,
    input: String,
}

impl OpenAiClient {
    /// Create a new client
    ///
    /// # Parameters
    ///
    /// - `endpoint`: API base URL (e.g., "https://api.openai.com")
    /// - `api_key`: bearer token for authentication
    /// - `model`: model identifier (e.g., "gpt-5")
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: model.into(),
            client,
        })
    }

    /// Create a client against the default endpoint
    pub fn default_endpoint(
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, LlmError> {
        Self::new(DEFAULT_ENDPOINT, api_key, model)
    }

    /// Send a prompt and return the model's raw text output
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The endpoint is unreachable or the request times out
    /// - The model is not available
    /// - The response carries no recognizable output text
    pub async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/v1/responses", self.endpoint);

        let request_body = ResponsesRequest {
            model: self.model.clone(),
            input: prompt.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotAvailable(self.model.clone()));
        }

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Communication(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        extract_output_text(&body)
            .ok_or_else(|| LlmError::InvalidResponse("No output text in response".to_string()))
    }
}

/// Pick the output text from a responses-API body
///
/// Three shapes are tolerated, in priority order: a structured `output`
/// list whose first message item carries the text in its first content
/// block, a flat `output_text` field, and a legacy `choices[0].text`.
fn extract_output_text(body: &Value) -> Option<String> {
    if let Some(first) = body.get("output").and_then(|o| o.get(0)) {
        if first.get("type").and_then(Value::as_str) == Some("message") {
            if let Some(text) = first
                .get("content")
                .and_then(|c| c.get(0))
                .and_then(|block| block.get("text"))
                .and_then(Value::as_str)
            {
                return Some(text.to_string());
            }
        }
    }

    if let Some(text) = body.get("output_text").and_then(Value::as_str) {
        return Some(text.to_string());
    }

    body.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|choice| choice.get("text"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

impl CompletionClientTrait for OpenAiClient {
    type Error = LlmError;

    fn complete(&self, prompt: &str) -> Result<String, Self::Error> {
        // Blocking wrapper for the async call
        tokio::runtime::Runtime::new()
            .map_err(|e| LlmError::Other(format!("Failed to start runtime: {}", e)))?
            .block_on(async { self.complete(prompt).await })
    }
}
