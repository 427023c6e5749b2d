//! Book club CRUD client.

use anyhow::{Result, bail};
use log::debug;
use serde_json::{Map, Value};

use super::error::ApiError;
use super::resource::{ResourceId, ResourceKind};
use crate::config::{ApiConfig, ConfigError};
use crate::http::HttpClient;

/// Client for the club/member/session endpoints under `{base}/functions/v1`.
///
/// Failures are classified into [`ApiError`] and returned as-is; nothing is
/// retried or deduplicated here.
#[derive(Clone)]
pub struct BookClubApi {
    http_client: HttpClient,
    functions_url: String,
}

impl BookClubApi {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        Self::with_base_url(&config.base_url, &config.api_key)
    }

    pub fn with_base_url(base_url: &str, api_key: &str) -> Result<Self> {
        if api_key.trim().is_empty() {
            bail!(ConfigError::Missing("API_KEY".to_string()));
        }
        let http_client = HttpClient::with_bearer_token(api_key)?;
        Ok(Self::from_http_client(http_client, base_url))
    }

    /// Create from an existing HttpClient.
    pub fn from_http_client(http_client: HttpClient, base_url: &str) -> Self {
        Self {
            http_client,
            functions_url: format!("{}/functions/v1", base_url.trim_end_matches('/')),
        }
    }

    pub fn functions_url(&self) -> &str {
        &self.functions_url
    }

    fn endpoint(&self, kind: ResourceKind) -> String {
        format!("{}/{}", self.functions_url, kind.path())
    }

    #[tracing::instrument(skip(self))]
    pub async fn get(&self, kind: ResourceKind, id: &ResourceId) -> Result<Value, ApiError> {
        debug!("Fetching {} {}...", kind, id);
        self.http_client
            .get_json(&self.endpoint(kind), &[("id", id.to_string())])
            .await
            .map_err(|e| ApiError::classify(e, kind, Some(id)))
    }

    #[tracing::instrument(skip(self, data))]
    pub async fn create(&self, kind: ResourceKind, data: &Value) -> Result<Value, ApiError> {
        debug!("Creating {}...", kind);
        self.http_client
            .post_json(&self.endpoint(kind), data)
            .await
            .map_err(|e| ApiError::classify(e, kind, None))
    }

    /// Sends `{"id": id, ..fields}`; an `id` key inside `fields` is ignored.
    #[tracing::instrument(skip(self, fields))]
    pub async fn update(
        &self,
        kind: ResourceKind,
        id: &ResourceId,
        fields: &Map<String, Value>,
    ) -> Result<Value, ApiError> {
        debug!("Updating {} {} ({} fields)...", kind, id, fields.len());

        let mut payload = Map::with_capacity(fields.len() + 1);
        payload.insert("id".to_string(), id.to_value());
        for (key, value) in fields.iter().filter(|(key, _)| key.as_str() != "id") {
            payload.insert(key.clone(), value.clone());
        }

        self.http_client
            .put_json(&self.endpoint(kind), &Value::Object(payload))
            .await
            .map_err(|e| ApiError::classify(e, kind, Some(id)))
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, kind: ResourceKind, id: &ResourceId) -> Result<Value, ApiError> {
        debug!("Deleting {} {}...", kind, id);
        self.http_client
            .delete_json(&self.endpoint(kind), &[("id", id.to_string())])
            .await
            .map_err(|e| ApiError::classify(e, kind, Some(id)))
    }

    // Club

    pub async fn get_club(&self, club_id: impl Into<ResourceId>) -> Result<Value, ApiError> {
        self.get(ResourceKind::Club, &club_id.into()).await
    }

    pub async fn create_club(&self, club_data: &Value) -> Result<Value, ApiError> {
        self.create(ResourceKind::Club, club_data).await
    }

    pub async fn update_club(
        &self,
        club_id: impl Into<ResourceId>,
        fields: &Map<String, Value>,
    ) -> Result<Value, ApiError> {
        self.update(ResourceKind::Club, &club_id.into(), fields).await
    }

    pub async fn delete_club(&self, club_id: impl Into<ResourceId>) -> Result<Value, ApiError> {
        self.delete(ResourceKind::Club, &club_id.into()).await
    }

    // Member

    pub async fn get_member(&self, member_id: impl Into<ResourceId>) -> Result<Value, ApiError> {
        self.get(ResourceKind::Member, &member_id.into()).await
    }

    pub async fn create_member(&self, member_data: &Value) -> Result<Value, ApiError> {
        self.create(ResourceKind::Member, member_data).await
    }

    pub async fn update_member(
        &self,
        member_id: impl Into<ResourceId>,
        fields: &Map<String, Value>,
    ) -> Result<Value, ApiError> {
        self.update(ResourceKind::Member, &member_id.into(), fields)
            .await
    }

    pub async fn delete_member(&self, member_id: impl Into<ResourceId>) -> Result<Value, ApiError> {
        self.delete(ResourceKind::Member, &member_id.into()).await
    }

    // Session

    pub async fn get_session(&self, session_id: impl Into<ResourceId>) -> Result<Value, ApiError> {
        self.get(ResourceKind::Session, &session_id.into()).await
    }

    pub async fn create_session(&self, session_data: &Value) -> Result<Value, ApiError> {
        self.create(ResourceKind::Session, session_data).await
    }

    pub async fn update_session(
        &self,
        session_id: impl Into<ResourceId>,
        fields: &Map<String, Value>,
    ) -> Result<Value, ApiError> {
        self.update(ResourceKind::Session, &session_id.into(), fields)
            .await
    }

    pub async fn delete_session(
        &self,
        session_id: impl Into<ResourceId>,
    ) -> Result<Value, ApiError> {
        self.delete(ResourceKind::Session, &session_id.into()).await
    }
}
