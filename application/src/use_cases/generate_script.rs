//! Generate Script use case
//!
//! Asks the text model for a ten-page story and parses the reply.

use super::errors::GenerationError;
use crate::config::GenerationParams;
use crate::ports::llm_gateway::{LlmGateway, TextRequest};
use std::sync::Arc;
use storybook_domain::{PageText, PromptTemplate, StoryPrompt, parse_story_script, preview};
use tracing::{debug, info, warn};

/// Use case for writing the story script
pub struct GenerateScriptUseCase<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    params: GenerationParams,
}

impl<G: LlmGateway + 'static> GenerateScriptUseCase<G> {
    pub fn new(gateway: Arc<G>, params: GenerationParams) -> Self {
        Self { gateway, params }
    }

    /// Produce exactly ten page texts for `prompt`
    ///
    /// One request is made. A reply that does not parse into ten pages is
    /// an error; it is never truncated or padded.
    pub async fn execute(&self, prompt: &StoryPrompt) -> Result<Vec<PageText>, GenerationError> {
        info!(model = %self.params.text_model, "Generating story script");

        let system_prompt = PromptTemplate::story_system();
        let user_prompt = PromptTemplate::story_request(prompt.content());

        let reply = self
            .gateway
            .complete_text(TextRequest {
                model: &self.params.text_model,
                system_prompt: &system_prompt,
                user_prompt: &user_prompt,
                temperature: self.params.temperature,
            })
            .await
            .map_err(GenerationError::ScriptRequest)?;

        debug!(bytes = reply.len(), "Story script reply received");

        let pages = parse_story_script(&reply).inspect_err(|e| {
            warn!(error = %e, reply = %preview(&reply, 120), "Could not parse story script");
        })?;

        info!(pages = pages.len(), "Story script ready");
        Ok(pages)
    }
}
