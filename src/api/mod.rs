//! Book club backend: clubs, members and reading sessions.

mod client;
mod error;
mod resource;

pub use client::BookClubApi;
pub use error::{ApiError, CONNECTION_ERROR_MESSAGE};
pub use resource::{ResourceId, ResourceKind};
