//! Chat transport abstraction and the OpenAI chat-completions adapter.

use anyhow::{Result, bail};
use async_trait::async_trait;
use log::debug;
use reqwest::StatusCode;
use serde::Serialize;

use super::error::TransportError;
use super::message::Message;
use crate::config::{CompletionConfig, ConfigError};
use crate::http::{HttpClient, HttpError};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Performs one completion attempt and returns the first choice's text.
    async fn complete(
        &self,
        model: &str,
        messages: &[Message],
        temperature: f64,
    ) -> Result<String, TransportError>;
}

/// OpenAI API response types (internal).
mod api {
    use serde::Deserialize;

    #[derive(Deserialize, Debug)]
    pub struct ChatResponse {
        pub choices: Vec<Choice>,
    }

    #[derive(Deserialize, Debug)]
    pub struct Choice {
        pub message: ChoiceMessage,
    }

    #[derive(Deserialize, Debug)]
    pub struct ChoiceMessage {
        pub content: Option<String>,
    }

    #[derive(Deserialize, Debug)]
    pub struct ErrorEnvelope {
        pub error: ErrorBody,
    }

    #[derive(Deserialize, Debug)]
    pub struct ErrorBody {
        pub message: String,
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f64,
}

/// Talks to an OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiTransport {
    http_client: HttpClient,
    api_url: String,
}

impl OpenAiTransport {
    pub fn new(config: &CompletionConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            bail!(ConfigError::Missing("KEY_OPEN_AI".to_string()));
        }
        let http_client = HttpClient::with_bearer_token(&config.api_key)?;
        Ok(Self::from_http_client(http_client, &config.api_url))
    }

    /// Create from an existing HttpClient.
    pub fn from_http_client(http_client: HttpClient, api_url: &str) -> Self {
        Self {
            http_client,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_url)
    }
}

#[async_trait]
impl ChatTransport for OpenAiTransport {
    #[tracing::instrument(skip(self, messages))]
    async fn complete(
        &self,
        model: &str,
        messages: &[Message],
        temperature: f64,
    ) -> Result<String, TransportError> {
        let url = self.endpoint();
        debug!("Requesting completion from {} with {} messages...", url, messages.len());

        let body = serde_json::to_value(ChatRequest {
            model,
            messages,
            temperature,
        })
        .map_err(|e| TransportError::Unexpected(Box::new(e)))?;

        let value = self
            .http_client
            .post_json(&url, &body)
            .await
            .map_err(classify_error)?;

        let response: api::ChatResponse = serde_json::from_value(value)
            .map_err(|e| TransportError::Unexpected(Box::new(e)))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| TransportError::Unexpected("Response contained no message content".into()))
    }
}

/// Maps a raw HTTP failure onto the transport taxonomy.
pub fn classify_error(error: HttpError) -> TransportError {
    match error {
        HttpError::Status { status, body } => {
            let message = format!("HTTP {}: {}", status.as_u16(), upstream_message(&body));
            match status {
                StatusCode::TOO_MANY_REQUESTS => TransportError::RateLimited(message),
                // Request timeout and conflict are transient on this API.
                StatusCode::REQUEST_TIMEOUT | StatusCode::CONFLICT => TransportError::Api(message),
                s if s.is_server_error() => TransportError::Api(message),
                _ => TransportError::Unrecoverable(message),
            }
        }
        HttpError::Connect(e) | HttpError::Timeout(e) | HttpError::Transport(e) => {
            TransportError::Connection(e.to_string())
        }
        err @ (HttpError::Decode(_) | HttpError::Build(_)) => TransportError::Unexpected(Box::new(err)),
    }
}

/// Extracts `error.message` from an OpenAI error body, falling back to the raw text.
fn upstream_message(body: &str) -> String {
    serde_json::from_str::<api::ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.to_string())
}
