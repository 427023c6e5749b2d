use log::{error, info, warn};

use super::messages;
use crate::llm::{ChatTransport, CompletionClient, CompletionError};

/// Turns completion outcomes into text that can always be shown to a user.
pub struct AssistantService<T: ChatTransport> {
    client: CompletionClient<T>,
}

impl<T: ChatTransport> AssistantService<T> {
    pub fn new(client: CompletionClient<T>) -> Self {
        Self { client }
    }

    /// Never fails; every error is logged and replaced by a fallback string.
    #[tracing::instrument(skip(self))]
    pub async fn get_response(&self, prompt: &str) -> String {
        info!("Fetching completion for prompt");
        match self.client.complete_prompt(prompt).await {
            Ok(Some(text)) => text,
            Ok(None) => {
                warn!("No completion after all retries");
                messages::NO_RESPONSE.to_string()
            }
            Err(CompletionError::InvalidArgument(reason)) => {
                warn!("Rejected prompt: {}", reason);
                messages::INVALID_PROMPT.to_string()
            }
            Err(err) => {
                error!("Completion failed: {}", err);
                messages::ASSISTANT_UNAVAILABLE.to_string()
            }
        }
    }
}
