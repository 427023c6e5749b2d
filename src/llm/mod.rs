//! Language-model client with bounded retry.
//!
//! # Structure
//!
//! - `message` - Roles, messages and validated completion requests
//! - `error` - Transport and completion error taxonomies
//! - `retry` - Attempt state machine and backoff policy
//! - `transport` - The `ChatTransport` seam and its OpenAI implementation
//! - `client` - `CompletionClient`, which drives the state machine

mod client;
mod error;
mod message;
mod retry;
mod transport;

pub use client::CompletionClient;
pub use error::{BoxError, CompletionError, TransportError};
pub use message::{CompletionRequest, Message, Role};
pub use retry::{AttemptState, Backoff, RetryPolicy};
pub use transport::{ChatTransport, OpenAiTransport, classify_error};

#[cfg(test)]
pub use transport::MockChatTransport;
