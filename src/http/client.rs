//! Thin JSON-over-HTTP client.

use log::debug;
use reqwest::{
    Client, Method,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde_json::Value;

use super::error::HttpError;
use crate::config::mask_secret;

pub const USER_AGENT: &str = "quill-bot";

/// Query parameters that carry credentials and are masked in logs.
const SECRET_QUERY_PARAMS: &[&str] = &["key", "api_key", "access_token", "token"];

/// JSON HTTP client with fixed default headers.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client that sends `Authorization: Bearer <token>` and a JSON
    /// content type on every request.
    pub fn with_bearer_token(token: &str) -> Result<Self, HttpError> {
        let mut headers = HeaderMap::new();
        let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| HttpError::Build(format!("invalid credential: {}", e)))?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;

        Ok(Self::new(client))
    }

    /// Sends one request and decodes the JSON response body.
    ///
    /// A 2xx response with an empty body decodes to `Value::Null`.
    #[tracing::instrument(skip(self, query, body))]
    pub async fn send_json(
        &self,
        method: Method,
        url: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Value, HttpError> {
        debug!("{} {} with query {:?}...", method, url, loggable_query(query));

        let mut request = self.client.request(method, url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(HttpError::from_reqwest)?;
        let status = response.status();
        let text = response.text().await.map_err(HttpError::from_reqwest)?;

        if !status.is_success() {
            debug!("{} responded with {}", url, status);
            return Err(HttpError::Status { status, body: text });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(HttpError::Decode)
    }

    pub async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value, HttpError> {
        self.send_json(Method::GET, url, query, None).await
    }

    pub async fn post_json(&self, url: &str, body: &Value) -> Result<Value, HttpError> {
        self.send_json(Method::POST, url, &[], Some(body)).await
    }

    pub async fn put_json(&self, url: &str, body: &Value) -> Result<Value, HttpError> {
        self.send_json(Method::PUT, url, &[], Some(body)).await
    }

    pub async fn delete_json(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Value, HttpError> {
        self.send_json(Method::DELETE, url, query, None).await
    }
}

fn loggable_query<'a>(query: &[(&'a str, String)]) -> Vec<(&'a str, String)> {
    query
        .iter()
        .map(|(name, value)| {
            let shown = if SECRET_QUERY_PARAMS.contains(name) {
                mask_secret(value)
            } else {
                value.clone()
            };
            (*name, shown)
        })
        .collect()
}
