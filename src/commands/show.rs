use anyhow::Result;

use crate::{
    api::{ResourceId, ResourceKind},
    llm::CompletionClient,
    runtime::Runtime,
    service::{AssistantService, BookClubService},
};

use super::{book_club_api, completion_config};

/// Print a readable summary of a club, member or session
#[tracing::instrument(skip(runtime, api_url))]
pub async fn show<R: Runtime>(
    runtime: R,
    api_url: Option<String>,
    kind: ResourceKind,
    id: &ResourceId,
) -> Result<()> {
    let service = BookClubService::new(book_club_api(&runtime, api_url)?);
    let text = match kind {
        ResourceKind::Club => service.describe_club(id).await,
        ResourceKind::Member => service.describe_member(id).await,
        ResourceKind::Session => service.describe_session(id).await,
    };
    println!("{}", text);
    Ok(())
}

/// Add (or with a negative delta, remove) points for a member
#[tracing::instrument(skip(runtime, api_url))]
pub async fn points<R: Runtime>(
    runtime: R,
    api_url: Option<String>,
    member_id: &ResourceId,
    delta: i64,
) -> Result<()> {
    let service = BookClubService::new(book_club_api(&runtime, api_url)?);
    println!("{}", service.award_points(member_id, delta).await);
    Ok(())
}

/// Ask the language model what a club's active book is about
#[tracing::instrument(skip(runtime, api_url))]
pub async fn summary<R: Runtime>(
    runtime: R,
    api_url: Option<String>,
    model: Option<String>,
    club_id: &ResourceId,
) -> Result<()> {
    let service = BookClubService::new(book_club_api(&runtime, api_url)?);
    let config = completion_config(&runtime, model)?;
    let assistant = AssistantService::new(CompletionClient::openai(&config)?);
    println!("{}", service.book_summary(club_id, &assistant).await);
    Ok(())
}
