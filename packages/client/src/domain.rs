//! Domain logic for client-side operations.
//!
//! This module contains pure functions that implement business logic
//! without side effects, making them easy to test.

use crate::error::ClientError;

/// One line typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Send the text to the current room
    Chat(String),
    /// `/room <id>`: send subsequent messages to another room
    SwitchRoom(String),
    /// `/room` without an id
    MissingRoom,
}

/// Interpret a trimmed, non-empty input line.
pub fn parse_input(line: &str) -> Input {
    match line.strip_prefix("/room") {
        Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => {
            let room = rest.trim();
            if room.is_empty() {
                Input::MissingRoom
            } else {
                Input::SwitchRoom(room.to_string())
            }
        }
        _ => Input::Chat(line.to_string()),
    }
}

/// Check if the client should exit immediately based on the error type.
///
/// A rejected token will be rejected again, so retrying is pointless.
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(error, ClientError::Unauthorized)
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The current reconnection attempt count (0-indexed)
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    if should_exit_immediately(error) {
        return false;
    }

    current_attempt < max_attempts
}
