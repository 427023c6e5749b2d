//! HTTP client module shared by the completion, club API and weather clients.
//!
//! This layer performs exactly one request per call and reports the raw
//! outcome; retry and error classification belong to the callers.

mod client;
mod error;

pub use client::{HttpClient, USER_AGENT};
pub use error::HttpError;
