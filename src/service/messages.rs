//! User-facing text substituted for failures.

use rand::seq::SliceRandom;

use crate::api::ApiError;

/// The model gave up after every retry.
pub const NO_RESPONSE: &str =
    "Sorry, I couldn't come up with a response right now. Please try again in a moment.";

/// The prompt could not be turned into a valid request.
pub const INVALID_PROMPT: &str =
    "I couldn't make sense of that request. Try rephrasing your question.";

/// The language model rejected the request or failed unexpectedly.
pub const ASSISTANT_UNAVAILABLE: &str =
    "My thinking cap is out of order right now. Please let an admin know.";

/// The club has no active session to summarize.
pub const NO_ACTIVE_SESSION: &str =
    "This club isn't reading anything right now. Start a session and ask me again! 📚";

pub const NOT_FOUND_MESSAGES: &[&str] = &[
    "I searched every shelf in the library and couldn't find that one. 📚",
    "That page seems to have been torn out of the book. 🔍",
    "Not even the owls could track that down. 🦉",
];

pub const VALIDATION_MESSAGES: &[&str] = &[
    "Hmm, that doesn't look quite right. Double-check what you sent. ✏️",
    "The librarian frowned at that request. Try fixing the details. 📝",
    "That request has a typo somewhere in its margins. 🧐",
];

pub const AUTHENTICATION_MESSAGES: &[&str] = &[
    "The library doors are locked and I don't have the key. 🔒",
    "My library card was declined. Someone should check my credentials. 🪪",
    "I'm not allowed into that section of the archive. 🚫",
];

pub const CONNECTION_MESSAGES: &[&str] = &[
    "I can't reach the library right now. Is it open? 🏛️",
    "The bridge to the archive is out. Try again soon. 🌉",
    "My carrier pigeon never came back. 🕊️",
];

pub const GENERIC_MESSAGES: &[&str] = &[
    "Something went sideways in the stacks. 🌀",
    "A bookshelf toppled over somewhere. Please try again. 📖",
    "The plot took an unexpected twist. 🍄",
];

/// Message set for the category of `error`.
pub fn messages_for(error: &ApiError) -> &'static [&'static str] {
    match error {
        ApiError::NotFound { .. } => NOT_FOUND_MESSAGES,
        ApiError::Validation(_) => VALIDATION_MESSAGES,
        ApiError::Authentication(_) => AUTHENTICATION_MESSAGES,
        ApiError::Connection => CONNECTION_MESSAGES,
        ApiError::Api { .. } => GENERIC_MESSAGES,
    }
}

/// Picks one line uniformly at random from the error's category.
pub fn whimsical_message(error: &ApiError) -> &'static str {
    messages_for(error)
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or("Something went wrong.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ResourceKind;

    #[test]
    fn test_each_category_has_its_own_set() {
        let not_found = ApiError::NotFound {
            kind: ResourceKind::Club,
            id: None,
            message: "Club not found.".to_string(),
        };
        assert_eq!(messages_for(&not_found), NOT_FOUND_MESSAGES);
        assert_eq!(
            messages_for(&ApiError::Validation(String::new())),
            VALIDATION_MESSAGES
        );
        assert_eq!(
            messages_for(&ApiError::Authentication(String::new())),
            AUTHENTICATION_MESSAGES
        );
        assert_eq!(messages_for(&ApiError::Connection), CONNECTION_MESSAGES);
        assert_eq!(
            messages_for(&ApiError::Api {
                status: Some(500),
                message: String::new()
            }),
            GENERIC_MESSAGES
        );
    }

    #[test]
    fn test_whimsical_message_comes_from_category() {
        for _ in 0..20 {
            let line = whimsical_message(&ApiError::Connection);
            assert!(CONNECTION_MESSAGES.contains(&line));
        }
    }

    #[test]
    fn test_repeated_failures_vary() {
        let lines: std::collections::HashSet<&str> = (0..200)
            .map(|_| whimsical_message(&ApiError::Connection))
            .collect();
        assert!(lines.len() > 1);
    }
}
