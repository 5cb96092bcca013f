//! Command parsing.

/// Actions a client may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Write,
    Read,
    Append,
    Delete,
    Find,
    Help,
    Quit,
}

impl Action {
    /// Map a lower-cased action token to an action.
    ///
    /// Returns `None` for tokens outside the recognized set; the validator
    /// reports those back to the client with the literal token.
    pub fn from_token(token: &str) -> Option<Action> {
        match token {
            "write" => Some(Action::Write),
            "read" => Some(Action::Read),
            "append" => Some(Action::Append),
            "delete" => Some(Action::Delete),
            "find" => Some(Action::Find),
            "help" => Some(Action::Help),
            "quit" => Some(Action::Quit),
            _ => None,
        }
    }
}

/// One client request line, split into its tokens.
///
/// Produced by [`parse`]; consumed once by the validator and dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Lower-cased action token. `None` when the line was empty.
    /// Unrecognized tokens are kept verbatim for error reporting.
    pub action: Option<String>,
    /// Lower-cased filename token.
    pub filename: Option<String>,
    /// Remaining tokens re-joined with single spaces, original casing.
    pub payload: Option<String>,
}

/// Split a raw line into action, filename, and free-text payload.
///
/// Parsing is total: any input string, including the empty string, yields
/// a `Command`. Missing tokens are `None`, never the empty string.
pub fn parse(line: &str) -> Command {
    let mut tokens = line.split_whitespace();

    let action = tokens.next().map(|t| t.to_lowercase());
    let filename = tokens.next().map(|t| t.to_lowercase());
    let rest: Vec<&str> = tokens.collect();
    let payload = if rest.is_empty() {
        None
    } else {
        Some(rest.join(" "))
    };

    Command {
        action,
        filename,
        payload,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_command() {
        let cmd = parse("write notes.txt hello world");
        assert_eq!(cmd.action.as_deref(), Some("write"));
        assert_eq!(cmd.filename.as_deref(), Some("notes.txt"));
        assert_eq!(cmd.payload.as_deref(), Some("hello world"));
    }

    #[test]
    fn test_parse_lowercases_action_and_filename_only() {
        let cmd = parse("WRITE Notes.TXT Hello World");
        assert_eq!(cmd.action.as_deref(), Some("write"));
        assert_eq!(cmd.filename.as_deref(), Some("notes.txt"));
        assert_eq!(cmd.payload.as_deref(), Some("Hello World"));
    }

    #[test]
    fn test_parse_collapses_whitespace_runs() {
        let cmd = parse("  append   a.txt   one\t two  ");
        assert_eq!(cmd.action.as_deref(), Some("append"));
        assert_eq!(cmd.filename.as_deref(), Some("a.txt"));
        assert_eq!(cmd.payload.as_deref(), Some("one two"));
    }

    #[test]
    fn test_parse_empty_line_yields_absent_fields() {
        for line in ["", "   ", "\t"] {
            let cmd = parse(line);
            assert_eq!(cmd.action, None);
            assert_eq!(cmd.filename, None);
            assert_eq!(cmd.payload, None);
        }
    }

    #[test]
    fn test_parse_missing_tokens_are_none_not_empty() {
        let cmd = parse("read");
        assert_eq!(cmd.action.as_deref(), Some("read"));
        assert_eq!(cmd.filename, None);
        assert_eq!(cmd.payload, None);
    }

    #[test]
    fn test_parse_keeps_unknown_action_literal() {
        let cmd = parse("Frobnicate x");
        assert_eq!(cmd.action.as_deref(), Some("frobnicate"));
        assert_eq!(Action::from_token("frobnicate"), None);
    }

    #[test]
    fn test_action_from_token() {
        assert_eq!(Action::from_token("write"), Some(Action::Write));
        assert_eq!(Action::from_token("quit"), Some(Action::Quit));
        assert_eq!(Action::from_token("WRITE"), None);
    }
}
