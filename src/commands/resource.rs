use anyhow::{Context, Result, bail};
use log::debug;
use serde_json::{Map, Value};

use crate::{
    api::{BookClubApi, ResourceId, ResourceKind},
    runtime::Runtime,
};

use super::book_club_api;

/// One CRUD verb against a resource family. Payloads are raw JSON text.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceAction {
    Get(ResourceId),
    Create(String),
    Update(ResourceId, String),
    Delete(ResourceId),
}

/// Run a CRUD action and print the decoded response
#[tracing::instrument(skip(runtime, api_url))]
pub async fn resource<R: Runtime>(
    runtime: R,
    api_url: Option<String>,
    kind: ResourceKind,
    action: ResourceAction,
) -> Result<()> {
    let api = book_club_api(&runtime, api_url)?;
    let response = run(&api, kind, action).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

pub(crate) async fn run(api: &BookClubApi, kind: ResourceKind, action: ResourceAction) -> Result<Value> {
    debug!("Running {:?} on {}", action, kind);
    let response = match action {
        ResourceAction::Get(id) => api.get(kind, &id).await?,
        ResourceAction::Create(data) => api.create(kind, &parse_payload(&data)?).await?,
        ResourceAction::Update(id, data) => api.update(kind, &id, &parse_fields(&data)?).await?,
        ResourceAction::Delete(id) => api.delete(kind, &id).await?,
    };
    Ok(response)
}

fn parse_payload(data: &str) -> Result<Value> {
    serde_json::from_str(data).with_context(|| format!("Invalid JSON payload: {}", data))
}

fn parse_fields(data: &str) -> Result<Map<String, Value>> {
    match parse_payload(data)? {
        Value::Object(fields) => Ok(fields),
        other => bail!("Update data must be a JSON object, got: {}", other),
    }
}
