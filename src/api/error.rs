use reqwest::StatusCode;
use thiserror::Error;

use super::resource::{ResourceId, ResourceKind};
use crate::http::HttpError;

pub const CONNECTION_ERROR_MESSAGE: &str = "Connection error: Could not connect to the API. Check if the server is running and the URL is correct.";

/// Classified failure of a book club API call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP 404.
    #[error("{message}")]
    NotFound {
        kind: ResourceKind,
        id: Option<ResourceId>,
        message: String,
    },

    /// HTTP 400.
    #[error("Invalid request: {0}")]
    Validation(String),

    /// HTTP 401 or 403.
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Any other non-2xx status (`status` set) or transport failure (`status` unset).
    #[error("{message}")]
    Api {
        status: Option<u16>,
        message: String,
    },

    #[error("{}", CONNECTION_ERROR_MESSAGE)]
    Connection,
}

impl ApiError {
    /// Maps a raw HTTP outcome for `kind`/`id` onto the taxonomy.
    pub fn classify(error: HttpError, kind: ResourceKind, id: Option<&ResourceId>) -> Self {
        match error {
            HttpError::Status { status, body } => match status {
                StatusCode::NOT_FOUND => {
                    let id_info = id
                        .map(|id| format!(" with ID '{}'", id))
                        .unwrap_or_default();
                    ApiError::NotFound {
                        kind,
                        id: id.cloned(),
                        message: format!(
                            "{}{} not found. Check if it exists in this environment.",
                            kind.title(),
                            id_info
                        ),
                    }
                }
                StatusCode::BAD_REQUEST => ApiError::Validation(body),
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Authentication(body),
                _ => ApiError::Api {
                    status: Some(status.as_u16()),
                    message: format!("API error ({}): {}", status.as_u16(), body),
                },
            },
            HttpError::Connect(_) => ApiError::Connection,
            other => ApiError::Api {
                status: None,
                message: format!("Request failed: {}", other),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: u16, body: &str) -> HttpError {
        HttpError::Status {
            status: StatusCode::from_u16(code).unwrap(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_not_found_message_with_id() {
        let id = ResourceId::from("club-1");
        let err = ApiError::classify(status(404, ""), ResourceKind::Club, Some(&id));
        assert_eq!(
            err.to_string(),
            "Club with ID 'club-1' not found. Check if it exists in this environment."
        );
        assert!(matches!(
            err,
            ApiError::NotFound { kind: ResourceKind::Club, id: Some(_), .. }
        ));
    }

    #[test]
    fn test_not_found_message_without_id() {
        let err = ApiError::classify(status(404, ""), ResourceKind::Member, None);
        assert_eq!(
            err.to_string(),
            "Member not found. Check if it exists in this environment."
        );
    }

    #[test]
    fn test_validation_includes_body() {
        let err = ApiError::classify(status(400, "name is required"), ResourceKind::Member, None);
        assert_eq!(err.to_string(), "Invalid request: name is required");
    }

    #[test]
    fn test_auth_statuses() {
        for code in [401, 403] {
            let err = ApiError::classify(status(code, "bad token"), ResourceKind::Session, None);
            assert!(matches!(err, ApiError::Authentication(ref body) if body == "bad token"));
            assert_eq!(err.to_string(), "Authentication error: bad token");
        }
    }

    #[test]
    fn test_other_status_is_generic() {
        let err = ApiError::classify(status(500, "boom"), ResourceKind::Club, None);
        assert!(matches!(err, ApiError::Api { status: Some(500), .. }));
        assert_eq!(err.to_string(), "API error (500): boom");

        let err = ApiError::classify(status(409, "conflict"), ResourceKind::Club, None);
        assert!(matches!(err, ApiError::Api { status: Some(409), .. }));
    }

    #[test]
    fn test_decode_failure_is_generic() {
        let json_err = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let err = ApiError::classify(HttpError::Decode(json_err), ResourceKind::Club, None);
        assert!(matches!(err, ApiError::Api { status: None, .. }));
        assert!(err.to_string().starts_with("Request failed: "));
    }

    #[test]
    fn test_connection_message_is_fixed() {
        assert_eq!(ApiError::Connection.to_string(), CONNECTION_ERROR_MESSAGE);
    }
}
