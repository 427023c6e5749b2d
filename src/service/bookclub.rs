use log::warn;
use serde_json::{Map, Value, json};

use super::assistant::AssistantService;
use super::messages::{NO_ACTIVE_SESSION, whimsical_message};
use crate::api::{ApiError, BookClubApi, ResourceId};
use crate::llm::ChatTransport;

/// Renders book club records as chat-ready text.
///
/// Every method returns text; API failures become a whimsical line followed by
/// the classified error.
#[derive(Clone)]
pub struct BookClubService {
    api: BookClubApi,
}

impl BookClubService {
    pub fn new(api: BookClubApi) -> Self {
        Self { api }
    }

    #[tracing::instrument(skip(self))]
    pub async fn describe_club(&self, club_id: &ResourceId) -> String {
        match self.api.get_club(club_id).await {
            Ok(club) => format_club(&club),
            Err(err) => self.error_message(&err),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn describe_session(&self, session_id: &ResourceId) -> String {
        match self.api.get_session(session_id).await {
            Ok(session) => format_session(&session),
            Err(err) => self.error_message(&err),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn describe_member(&self, member_id: &ResourceId) -> String {
        match self.api.get_member(member_id).await {
            Ok(member) => format_member(&member),
            Err(err) => self.error_message(&err),
        }
    }

    /// Adds `delta` (possibly negative) to the member's points.
    #[tracing::instrument(skip(self))]
    pub async fn award_points(&self, member_id: &ResourceId, delta: i64) -> String {
        match self.try_award_points(member_id, delta).await {
            Ok(message) => message,
            Err(err) => self.error_message(&err),
        }
    }

    async fn try_award_points(&self, member_id: &ResourceId, delta: i64) -> Result<String, ApiError> {
        let member = self.api.get_member(member_id).await?;
        let current = member.get("points").and_then(Value::as_i64).unwrap_or(0);
        let points = current.saturating_add(delta);

        let mut fields = Map::new();
        fields.insert("points".to_string(), json!(points));
        self.api.update_member(member_id, &fields).await?;

        Ok(format!(
            "**{}** now has {} points ({:+}).",
            text(&member, "/name"),
            points,
            delta
        ))
    }

    /// Asks the assistant what the club's active book is about.
    #[tracing::instrument(skip(self, assistant))]
    pub async fn book_summary<T: ChatTransport>(
        &self,
        club_id: &ResourceId,
        assistant: &AssistantService<T>,
    ) -> String {
        let club = match self.api.get_club(club_id).await {
            Ok(club) => club,
            Err(err) => return self.error_message(&err),
        };
        match active_book_title(&club) {
            Some(title) => {
                assistant
                    .get_response(&format!("What is {} about?", title))
                    .await
            }
            None => NO_ACTIVE_SESSION.to_string(),
        }
    }

    pub fn error_message(&self, error: &ApiError) -> String {
        warn!("Book club API call failed: {}", error);
        format!("{}\n{}", whimsical_message(error), error)
    }
}

fn text(value: &Value, pointer: &str) -> String {
    match value.pointer(pointer) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => "Unknown".to_string(),
        Some(other) => other.to_string(),
    }
}

fn active_book_title(club: &Value) -> Option<&str> {
    club.pointer("/activeSession/book/title")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|title| !title.is_empty())
}

fn format_book(session: &Value) -> String {
    format!(
        "**{}** by {}",
        text(session, "/book/title"),
        text(session, "/book/author")
    )
}

fn format_club(club: &Value) -> String {
    let members = club
        .get("members")
        .and_then(Value::as_array)
        .map_or(0, Vec::len);
    let reading = match club.get("activeSession") {
        Some(session) if session.is_object() => format_book(session),
        _ => "No active session".to_string(),
    };
    format!(
        "📚 **{}**\nMembers: {}\nCurrently reading: {}",
        text(club, "/name"),
        members,
        reading
    )
}

fn format_session(session: &Value) -> String {
    let discussions = session
        .get("discussions")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let next = discussions
        .first()
        .map(|d| text(d, "/date"))
        .unwrap_or_else(|| "None scheduled".to_string());
    format!(
        "📚 {}\nDue date: **{}**\nNumber of discussions: #{}\nNext discussion: {}",
        format_book(session),
        text(session, "/dueDate"),
        discussions.len(),
        next
    )
}

fn format_member(member: &Value) -> String {
    let points = member.get("points").and_then(Value::as_i64).unwrap_or(0);
    format!("**{}** has {} points.", text(member, "/name"), points)
}
