//! Configuration read from the environment at construction time.
//!
//! Every client takes its configuration record by reference when it is built,
//! so a missing credential fails immediately instead of on first use.

use std::fmt;
use std::time::Duration;

use log::debug;
use thiserror::Error;

use crate::runtime::Runtime;

pub const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);
pub const DEFAULT_WEATHER_API_URL: &str = "https://api.weatherbit.io/v2.0";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable is not set.")]
    Missing(String),
}

/// Deployment environment, selected by `ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    pub fn from_runtime<R: Runtime + ?Sized>(runtime: &R) -> Self {
        match runtime.env_var("ENV").as_deref() {
            Ok("dev") => Environment::Development,
            _ => Environment::Production,
        }
    }

    /// Log filter used when `RUST_LOG` is not set.
    pub fn default_log_filter(self) -> &'static str {
        match self {
            Environment::Development => "debug",
            Environment::Production => "warn",
        }
    }
}

/// Settings for the chat-completion client.
#[derive(Clone, PartialEq)]
pub struct CompletionConfig {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
    pub temperature: f64,
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl CompletionConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: DEFAULT_OPENAI_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    pub fn from_runtime<R: Runtime + ?Sized>(runtime: &R) -> Result<Self, ConfigError> {
        let api_key = required(runtime, &["KEY_OPEN_AI"])?;
        debug!("Using KEY_OPEN_AI: {}", mask_secret(&api_key));

        let mut config = Self::new(api_key);
        if let Some(url) = optional(runtime, "OPENAI_API_URL") {
            config.api_url = url;
        }
        if let Some(model) = optional(runtime, "OPENAI_MODEL") {
            config.model = model;
        }
        Ok(config)
    }
}

impl fmt::Debug for CompletionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionConfig")
            .field("api_key", &mask_secret(&self.api_key))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_retries", &self.max_retries)
            .field("retry_delay", &self.retry_delay)
            .finish()
    }
}

/// Settings for the book club CRUD backend.
#[derive(Clone, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: String,
}

impl ApiConfig {
    pub fn from_runtime<R: Runtime + ?Sized>(runtime: &R) -> Result<Self, ConfigError> {
        Self::resolve(runtime, None)
    }

    /// Like [`ApiConfig::from_runtime`], with `base_url` taking precedence over the environment.
    pub fn resolve<R: Runtime + ?Sized>(
        runtime: &R,
        base_url: Option<String>,
    ) -> Result<Self, ConfigError> {
        let base_url = match base_url.filter(|url| !url.trim().is_empty()) {
            Some(url) => url,
            None => required(runtime, &["API_URL", "SUPABASE_URL"])?,
        };
        let api_key = required(runtime, &["API_KEY", "SUPABASE_KEY"])?;
        debug!("Using book club API at {} with key {}", base_url, mask_secret(&api_key));
        Ok(Self { base_url, api_key })
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &mask_secret(&self.api_key))
            .finish()
    }
}

/// Settings for the weather lookup.
#[derive(Clone, PartialEq)]
pub struct WeatherConfig {
    pub api_key: String,
    pub api_url: String,
}

impl WeatherConfig {
    pub fn from_runtime<R: Runtime + ?Sized>(runtime: &R) -> Result<Self, ConfigError> {
        let api_key = required(runtime, &["KEY_WEATHER"])?;
        let api_url = optional(runtime, "WEATHER_API_URL")
            .unwrap_or_else(|| DEFAULT_WEATHER_API_URL.to_string());
        Ok(Self { api_key, api_url })
    }
}

impl fmt::Debug for WeatherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherConfig")
            .field("api_key", &mask_secret(&self.api_key))
            .field("api_url", &self.api_url)
            .finish()
    }
}

/// Returns the first non-empty value among `keys`; reports the first key when none is set.
fn required<R: Runtime + ?Sized>(runtime: &R, keys: &[&str]) -> Result<String, ConfigError> {
    keys.iter()
        .find_map(|key| optional(runtime, key))
        .ok_or_else(|| ConfigError::Missing(keys.first().copied().unwrap_or_default().to_string()))
}

fn optional<R: Runtime + ?Sized>(runtime: &R, key: &str) -> Option<String> {
    runtime
        .env_var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Masks a credential for logging, keeping at most four characters on each side.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}****{}", head, tail)
}
