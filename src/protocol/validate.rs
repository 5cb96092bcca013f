//! Command validation.

use super::command::Command;

/// The recognized action tokens.
///
/// `quit` is included even though the bundled client intercepts the word
/// locally and never transmits it; a client that does send it gets a
/// validated no-op response.
pub const KNOWN_ACTIONS: [&str; 7] = ["write", "read", "append", "delete", "find", "help", "quit"];

/// Outcome of validating a parsed command.
///
/// `message` is empty when `valid` is true, and a human-readable reason
/// otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid: bool,
    pub message: String,
}

impl ValidationResult {
    fn ok() -> Self {
        Self {
            valid: true,
            message: String::new(),
        }
    }

    fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
        }
    }
}

/// Check that a command names a recognized action and carries its required
/// arguments. Rules are checked in order; the first failure wins.
pub fn validate(cmd: &Command, known_actions: &[&str]) -> ValidationResult {
    let action = cmd.action.as_deref();

    if !action.is_some_and(|a| known_actions.contains(&a)) {
        return ValidationResult::invalid(format!(
            "'{}' is not a valid command",
            action.unwrap_or("")
        ));
    }

    match action {
        Some("write") if cmd.filename.is_none() => {
            ValidationResult::invalid("WRITE: must specify file name")
        }
        Some("read") if cmd.filename.is_none() => {
            ValidationResult::invalid("READ: must specify file name")
        }
        Some("append") if cmd.filename.is_none() || cmd.payload.is_none() => {
            ValidationResult::invalid("APPEND: must specify file name and data")
        }
        Some("delete") if cmd.filename.is_none() => {
            ValidationResult::invalid("DELETE: must specify file name")
        }
        Some("find") if cmd.filename.is_none() => {
            ValidationResult::invalid("FIND: must specify file name to search for")
        }
        _ => ValidationResult::ok(),
    }
}
