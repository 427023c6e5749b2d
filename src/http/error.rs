use reqwest::StatusCode;
use thiserror::Error;

/// Raw outcome of a failed HTTP exchange, before any domain classification.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// The connection could not be established.
    #[error("Connection failed: {0}")]
    Connect(#[source] reqwest::Error),

    #[error("Request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    /// Any other failure while sending the request or reading the response.
    #[error("Request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// A 2xx response whose body was not valid JSON.
    #[error("Failed to parse JSON response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Failed to build HTTP client: {0}")]
    Build(String),
}

impl HttpError {
    /// Sorts a reqwest send/read failure into connect, timeout or generic transport.
    pub fn from_reqwest(error: reqwest::Error) -> Self {
        if error.is_connect() {
            HttpError::Connect(error)
        } else if error.is_timeout() {
            HttpError::Timeout(error)
        } else {
            HttpError::Transport(error)
        }
    }
}
