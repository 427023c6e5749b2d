use anyhow::Result;
use log::debug;

use crate::{llm::CompletionClient, runtime::Runtime, service::AssistantService};

use super::completion_config;

/// Ask the language model a question and print the answer
#[tracing::instrument(skip(runtime, prompt))]
pub async fn ask<R: Runtime>(runtime: R, prompt: &str, model: Option<String>) -> Result<()> {
    let config = completion_config(&runtime, model)?;
    debug!("Using model {}", config.model);

    let assistant = AssistantService::new(CompletionClient::openai(&config)?);
    println!("{}", assistant.get_response(prompt).await);
    Ok(())
}
