//! Operator commands driven by the `quill` binary.
//!
//! Each command reads its configuration through a [`Runtime`], builds the
//! clients it needs, and prints its result to stdout.

use anyhow::{Context, Result};

use crate::{
    api::BookClubApi,
    config::{ApiConfig, CompletionConfig},
    runtime::Runtime,
};

mod ask;
mod resource;
mod show;
mod weather;

pub use ask::ask;
pub use resource::{ResourceAction, resource};
pub use show::{points, show, summary};
pub use weather::weather;

fn completion_config<R: Runtime>(runtime: &R, model: Option<String>) -> Result<CompletionConfig> {
    let mut config = CompletionConfig::from_runtime(runtime)?;
    if let Some(model) = model.filter(|m| !m.trim().is_empty()) {
        config.model = model;
    }
    Ok(config)
}

fn book_club_api<R: Runtime>(runtime: &R, api_url: Option<String>) -> Result<BookClubApi> {
    let config = ApiConfig::resolve(runtime, api_url)?;
    BookClubApi::new(&config).context("Failed to set up the book club API client")
}
