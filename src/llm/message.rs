//! Chat messages and completion requests, validated on construction.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::CompletionError;
use crate::config::{
    CompletionConfig, DEFAULT_MAX_RETRIES, DEFAULT_MODEL, DEFAULT_RETRY_DELAY, DEFAULT_TEMPERATURE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for Role {
    type Err = CompletionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system" => Ok(Role::System),
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            _ => Err(CompletionError::invalid(format!(
                "Unknown message role '{}'. Expected system, user, or assistant.",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Parses an untyped `{"role": ..., "content": ...}` record.
    pub fn from_value(value: &Value) -> Result<Self, CompletionError> {
        let malformed =
            || CompletionError::invalid("Each message must be an object with 'role' and 'content' keys");

        let object = value.as_object().ok_or_else(malformed)?;
        let role = object
            .get("role")
            .and_then(Value::as_str)
            .ok_or_else(malformed)?;
        let content = object
            .get("content")
            .and_then(Value::as_str)
            .ok_or_else(malformed)?;

        Ok(Self::new(role.parse()?, content))
    }
}

/// A chat-completion request together with its retry settings.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    messages: Vec<Message>,
    pub model: String,
    pub temperature: f64,
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl CompletionRequest {
    pub fn new(messages: Vec<Message>) -> Result<Self, CompletionError> {
        if messages.is_empty() {
            return Err(CompletionError::invalid("Messages list cannot be empty"));
        }
        Ok(Self {
            messages,
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
        })
    }

    /// A single user message.
    pub fn prompt(prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::user(prompt)],
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    /// Builds a request from an untyped JSON message list.
    pub fn from_json(messages: &Value) -> Result<Self, CompletionError> {
        let items = messages
            .as_array()
            .ok_or_else(|| CompletionError::invalid("Messages must be a list of message objects"))?;
        let messages = items
            .iter()
            .map(Message::from_value)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(messages)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Applies the model and retry settings from configuration.
    pub fn with_config(self, config: &CompletionConfig) -> Self {
        self.with_model(config.model.clone())
            .with_temperature(config.temperature)
            .with_max_retries(config.max_retries)
            .with_retry_delay(config.retry_delay)
    }

    pub fn validate(&self) -> Result<(), CompletionError> {
        if self.messages.is_empty() {
            return Err(CompletionError::invalid("Messages list cannot be empty"));
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(CompletionError::invalid(format!(
                "Temperature must be between 0.0 and 1.0, got {}",
                self.temperature
            )));
        }
        if self.retry_delay.is_zero() {
            return Err(CompletionError::invalid("Retry delay must be positive"));
        }
        if self.model.trim().is_empty() {
            return Err(CompletionError::invalid("Model identifier cannot be empty"));
        }
        Ok(())
    }
}
