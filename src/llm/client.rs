use anyhow::Result;
use log::debug;

use super::error::CompletionError;
use super::message::CompletionRequest;
use super::retry::{AttemptState, RetryPolicy};
use super::transport::{ChatTransport, OpenAiTransport};
use crate::config::CompletionConfig;

/// Chat-completion client that masks transient upstream failures.
pub struct CompletionClient<T: ChatTransport> {
    transport: T,
    config: CompletionConfig,
}

impl CompletionClient<OpenAiTransport> {
    pub fn openai(config: &CompletionConfig) -> Result<Self> {
        let transport = OpenAiTransport::new(config)?;
        Ok(Self::new(transport, config.clone()))
    }
}

impl<T: ChatTransport> CompletionClient<T> {
    pub fn new(transport: T, config: CompletionConfig) -> Self {
        Self { transport, config }
    }

    /// Runs a completion with retries.
    ///
    /// Returns `Ok(None)` when every permitted attempt hit a transient failure.
    /// Invalid requests fail before the transport is called; unrecoverable and
    /// unexpected failures are returned on the attempt that produced them.
    #[tracing::instrument(skip(self, request), fields(model = %request.model))]
    pub async fn create_chat_completion(
        &self,
        request: &CompletionRequest,
    ) -> Result<Option<String>, CompletionError> {
        request.validate()?;

        let policy = RetryPolicy::from(request);
        let mut state = AttemptState::Attempting { attempt: 0 };

        loop {
            state = match state {
                AttemptState::Attempting { attempt } => {
                    debug!("Completion attempt {}/{}", attempt + 1, policy.total_attempts());
                    let outcome = self
                        .transport
                        .complete(&request.model, request.messages(), request.temperature)
                        .await;
                    policy.on_outcome(attempt, outcome)
                }
                AttemptState::Waiting { attempt, delay } => {
                    tokio::time::sleep(delay).await;
                    AttemptState::Attempting {
                        attempt: attempt + 1,
                    }
                }
                AttemptState::Succeeded(text) => return Ok(Some(text)),
                AttemptState::ExhaustedRetries => return Ok(None),
                AttemptState::Failed(err) => return Err(err),
            };
        }
    }

    /// Sends `prompt` as a single user message using the configured defaults.
    pub async fn complete_prompt(&self, prompt: &str) -> Result<Option<String>, CompletionError> {
        let request = CompletionRequest::prompt(prompt).with_config(&self.config);
        self.create_chat_completion(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::error::TransportError;
    use crate::llm::message::{Message, Role};
    use crate::llm::transport::MockChatTransport;
    use mockall::Sequence;
    use serde_json::json;
    use std::time::Duration;

    fn client(transport: MockChatTransport) -> CompletionClient<MockChatTransport> {
        CompletionClient::new(transport, CompletionConfig::new("sk-test"))
    }

    fn question() -> CompletionRequest {
        CompletionRequest::new(vec![Message::user("What is the capital of France?")]).unwrap()
    }

    #[tokio::test]
    async fn test_invalid_messages_never_reach_transport() {
        let mut transport = MockChatTransport::new();
        transport.expect_complete().times(0);
        let client = client(transport);

        for messages in [
            json!([]),
            json!({"role": "user", "content": "hi"}),
            json!([{"role": "user"}]),
            json!([{"content": "hi"}]),
        ] {
            assert!(matches!(
                CompletionRequest::from_json(&messages),
                Err(CompletionError::InvalidArgument(_))
            ));
        }

        let out_of_range = question().with_temperature(2.0);
        let err = client.create_chat_completion(&out_of_range).await.unwrap_err();
        assert!(matches!(err, CompletionError::InvalidArgument(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_first_attempt() {
        let mut transport = MockChatTransport::new();
        transport
            .expect_complete()
            .withf(|model, messages, temperature| {
                model.to_string() == "gpt-3.5-turbo"
                    && messages.len() == 1
                    && messages[0].role == Role::User
                    && *temperature == 0.7
            })
            .times(1)
            .returning(|_, _, _| Ok("Paris.".to_string()));
        let client = client(transport);

        let start = tokio::time::Instant::now();
        let result = client.create_chat_completion(&question()).await.unwrap();

        assert_eq!(result, Some("Paris.".to_string()));
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limited_then_success_backs_off_exponentially() {
        let mut transport = MockChatTransport::new();
        let mut seq = Sequence::new();
        transport
            .expect_complete()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Err(TransportError::RateLimited("HTTP 429".to_string())));
        transport
            .expect_complete()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok("finally".to_string()));
        let client = client(transport);

        let request = question().with_retry_delay(Duration::from_millis(250));
        let start = tokio::time::Instant::now();
        let result = client.create_chat_completion(&request).await.unwrap();

        assert_eq!(result, Some("finally".to_string()));
        // 250ms * (2^0 + 2^1)
        assert_eq!(start.elapsed(), Duration::from_millis(750));
    }

    #[tokio::test(start_paused = true)]
    async fn test_always_rate_limited_returns_none() {
        let mut transport = MockChatTransport::new();
        transport
            .expect_complete()
            .times(4)
            .returning(|_, _, _| Err(TransportError::RateLimited("HTTP 429".to_string())));
        let client = client(transport);

        let start = tokio::time::Instant::now();
        let result = client.create_chat_completion(&question()).await.unwrap();

        assert_eq!(result, None);
        // 1s * (1 + 2 + 4); no wait after the final attempt
        assert_eq!(start.elapsed(), Duration::from_secs(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_connection_errors_back_off_linearly() {
        let mut transport = MockChatTransport::new();
        transport
            .expect_complete()
            .times(3)
            .returning(|_, _, _| Err(TransportError::Connection("reset by peer".to_string())));
        let client = client(transport);

        let request = question().with_max_retries(2);
        let start = tokio::time::Instant::now();
        let result = client.create_chat_completion(&request).await.unwrap();

        assert_eq!(result, None);
        assert_eq!(start.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_api_error_then_success() {
        let mut transport = MockChatTransport::new();
        let mut seq = Sequence::new();
        transport
            .expect_complete()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Err(TransportError::Api("HTTP 502".to_string())));
        transport
            .expect_complete()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok("recovered".to_string()));
        let client = client(transport);

        let start = tokio::time::Instant::now();
        let result = client.create_chat_completion(&question()).await.unwrap();

        assert_eq!(result, Some("recovered".to_string()));
        assert_eq!(start.elapsed(), Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unrecoverable_fails_without_retry() {
        let mut transport = MockChatTransport::new();
        transport
            .expect_complete()
            .times(1)
            .returning(|_, _, _| Err(TransportError::Unrecoverable("HTTP 401: bad key".to_string())));
        let client = client(transport);

        let start = tokio::time::Instant::now();
        let err = client.create_chat_completion(&question()).await.unwrap_err();

        assert!(matches!(err, CompletionError::Unrecoverable(_)));
        assert!(err.to_string().contains("HTTP 401: bad key"));
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unexpected_propagates_unmodified() {
        let mut transport = MockChatTransport::new();
        transport
            .expect_complete()
            .times(1)
            .returning(|_, _, _| Err(TransportError::Unexpected("malformed frame".into())));
        let client = client(transport);

        let err = client.create_chat_completion(&question()).await.unwrap_err();

        assert!(matches!(err, CompletionError::Unexpected(_)));
        assert_eq!(err.to_string(), "malformed frame");
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_retries_makes_one_attempt() {
        let mut transport = MockChatTransport::new();
        transport
            .expect_complete()
            .times(1)
            .returning(|_, _, _| Err(TransportError::Api("HTTP 500".to_string())));
        let client = client(transport);

        let result = client
            .create_chat_completion(&question().with_max_retries(0))
            .await
            .unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_complete_prompt_uses_config_defaults() {
        let mut config = CompletionConfig::new("sk-test");
        config.model = "gpt-4o-mini".to_string();
        config.temperature = 0.2;

        let mut transport = MockChatTransport::new();
        transport
            .expect_complete()
            .withf(|model, messages, temperature| {
                model.to_string() == "gpt-4o-mini"
                    && messages.len() == 1
                    && messages[0] == Message::user("Recommend a mystery novel")
                    && *temperature == 0.2
            })
            .times(1)
            .returning(|_, _, _| Ok("Try The Moonstone.".to_string()));
        let client = CompletionClient::new(transport, config);

        let result = client
            .complete_prompt("Recommend a mystery novel")
            .await
            .unwrap();
        assert_eq!(result, Some("Try The Moonstone.".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_the_call_cancels_during_backoff() {
        let mut transport = MockChatTransport::new();
        transport
            .expect_complete()
            .times(1)
            .returning(|_, _, _| Err(TransportError::RateLimited("HTTP 429".to_string())));
        let client = client(transport);

        let request = question().with_retry_delay(Duration::from_secs(60));
        let result = tokio::time::timeout(
            Duration::from_secs(5),
            client.create_chat_completion(&request),
        )
        .await;

        // Timed out while waiting; the transport saw exactly one call.
        assert!(result.is_err());
    }
}
