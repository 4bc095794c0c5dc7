//! Core Extractor implementation

use crate::config::ExtractorConfig;
use crate::error::ExtractionError;
use crate::parser::parse_actor_response;
use crate::prompt::build_extraction_prompt;
use castlist_domain::traits::CompletionClient;
use castlist_domain::ActorDraft;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info};

/// The Extractor turns a person description into a structured actor draft
pub struct Extractor<C>
where
    C: CompletionClient,
{
    client: Arc<C>,
    config: ExtractorConfig,
}

impl<C> Extractor<C>
where
    C: CompletionClient + Send + Sync + 'static,
    C::Error: std::fmt::Display,
{
    /// Create a new Extractor
    pub fn new(client: C, config: ExtractorConfig) -> Self {
        Self {
            client: Arc::new(client),
            config,
        }
    }

    /// Extract a structured actor draft from a description
    ///
    /// One LLM call, at most once; transport failures and timeouts map
    /// to typed errors and are never retried here.
    pub async fn extract(&self, description: &str) -> Result<ActorDraft, ExtractionError> {
        let length = description.chars().count();
        if length > self.config.max_description_length {
            return Err(ExtractionError::DescriptionTooLong(
                length,
                self.config.max_description_length,
            ));
        }

        let prompt = build_extraction_prompt(description);
        debug!("Prompt length: {} chars", prompt.len());

        let raw = timeout(self.config.extraction_timeout(), self.call_llm(&prompt))
            .await
            .map_err(|_| ExtractionError::Timeout)??;

        debug!("LLM response length: {} chars", raw.len());

        let draft = parse_actor_response(&raw, description)?;

        info!(
            "Extracted actor '{} {}' from description of {} chars",
            draft.first_name, draft.last_name, length
        );

        Ok(draft)
    }

    /// Call the completion client
    async fn call_llm(&self, prompt: &str) -> Result<String, ExtractionError> {
        let client = Arc::clone(&self.client);
        let prompt = prompt.to_string();

        // Call in a blocking context since CompletionClient is not async
        tokio::task::spawn_blocking(move || {
            client
                .complete(&prompt)
                .map_err(|e| ExtractionError::Llm(e.to_string()))
        })
        .await
        .map_err(|e| ExtractionError::Llm(format!("Task join error: {}", e)))?
    }
}
