//! Retry state machine for chat completions.
//!
//! Rate limits back off exponentially (`retry_delay * 2^attempt`); connection
//! and generic upstream failures wait a fixed `retry_delay`. Both degrade to
//! [`AttemptState::ExhaustedRetries`] on the final attempt.

use std::time::Duration;

use log::{error, warn};

use super::error::{CompletionError, TransportError};
use super::message::CompletionRequest;

/// Delay strategy for a retryable failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    Exponential,
    Fixed,
}

/// States of one `create_chat_completion` call. `attempt` counts from 0.
#[derive(Debug)]
pub enum AttemptState {
    Attempting { attempt: u32 },
    Waiting { attempt: u32, delay: Duration },
    Succeeded(String),
    ExhaustedRetries,
    Failed(CompletionError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl From<&CompletionRequest> for RetryPolicy {
    fn from(request: &CompletionRequest) -> Self {
        Self {
            max_retries: request.max_retries,
            retry_delay: request.retry_delay,
        }
    }
}

impl RetryPolicy {
    /// One initial attempt plus up to `max_retries` retries.
    pub fn total_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    pub fn delay_for(&self, backoff: Backoff, attempt: u32) -> Duration {
        match backoff {
            Backoff::Fixed => self.retry_delay,
            Backoff::Exponential => 2u32
                .checked_pow(attempt)
                .and_then(|factor| self.retry_delay.checked_mul(factor))
                .unwrap_or(Duration::MAX),
        }
    }

    /// Leaves `Attempting { attempt }` once that attempt's outcome is known.
    pub fn on_outcome(
        &self,
        attempt: u32,
        outcome: Result<String, TransportError>,
    ) -> AttemptState {
        match outcome {
            Ok(text) => AttemptState::Succeeded(text),
            Err(err @ TransportError::RateLimited(_)) => {
                self.retry_or_give_up(attempt, Backoff::Exponential, &err)
            }
            Err(err @ (TransportError::Connection(_) | TransportError::Api(_))) => {
                self.retry_or_give_up(attempt, Backoff::Fixed, &err)
            }
            Err(TransportError::Unrecoverable(message)) => {
                error!("Language model API rejected the request: {}", message);
                AttemptState::Failed(CompletionError::Unrecoverable(message))
            }
            Err(TransportError::Unexpected(inner)) => {
                error!("Unexpected error: {}", inner);
                AttemptState::Failed(CompletionError::Unexpected(inner))
            }
        }
    }

    fn retry_or_give_up(&self, attempt: u32, backoff: Backoff, err: &TransportError) -> AttemptState {
        if attempt >= self.max_retries {
            error!(
                "{}. Giving up after {} attempts.",
                err,
                self.total_attempts()
            );
            return AttemptState::ExhaustedRetries;
        }

        let delay = self.delay_for(backoff, attempt);
        warn!(
            "{}. Waiting {:.1} seconds before retry {}/{}...",
            err,
            delay.as_secs_f64(),
            attempt + 1,
            self.max_retries
        );
        AttemptState::Waiting { attempt, delay }
    }
}
