//! Response rendering for the wire protocol.
//!
//! All server-to-client text is produced here, as plain strings. Terminal
//! color is a client-side presentation concern and is not applied by the
//! server.

use super::command::Action;

/// Horizontal rule framing multi-line response blocks.
pub const DIVIDER: &str = "---------------------------------------------------------------";

/// Connection-established banner, sent once per connection.
pub fn banner() -> String {
    format!("> Connection established.\n{DIVIDER}")
}

/// The recurring prompt sent after the banner and after every response.
pub fn prompt() -> String {
    "> Enter a command, HELP, or QUIT:".to_string()
}

/// Rejection line for a command that failed validation.
pub fn error_line(message: &str) -> String {
    format!("> ERROR: {message}")
}

/// Immediate acknowledgment sent before a file operation runs.
///
/// Only the four file-mutating/reading actions acknowledge; `None` for the
/// rest.
pub fn ack_line(action: Action, filename: &str) -> Option<String> {
    match action {
        Action::Read => Some(format!("> Requesting to read '{filename}'...")),
        Action::Delete => Some(format!("> Requesting to delete '{filename}'...")),
        Action::Append => Some(format!("> Requesting to append data to '{filename}'...")),
        Action::Write => Some(format!("> Requesting to write to '{filename}'...")),
        Action::Find | Action::Help | Action::Quit => None,
    }
}

/// Success block for the write/append/delete actions; `None` for actions
/// whose success output carries data and is rendered elsewhere.
pub fn success_block(action: Action, filename: &str) -> Option<String> {
    match action {
        Action::Write => Some(format!("\n    Data written to file: '{filename}'\n")),
        Action::Append => Some(format!("\n    Data appended to file: '{filename}'\n")),
        Action::Delete => Some(format!("\n    File '{filename}' has been deleted.\n")),
        Action::Read | Action::Find | Action::Help | Action::Quit => None,
    }
}

/// Failure block wrapping a gateway-supplied reason.
pub fn failure_block(reason: &str) -> String {
    format!("\n    {reason}\n")
}

/// File content block for a successful read.
pub fn read_block(filename: &str, data: &str) -> String {
    format!("{DIVIDER}\n{filename}\n\n{data}\n{DIVIDER}")
}

/// Search result block: match count header, then one filename per line.
pub fn find_block(query: &str, matches: &[String]) -> String {
    let plural = if matches.len() != 1 { "s" } else { "" };
    format!(
        "{DIVIDER}\nFound {} result{} for '{}':\n\n{}\n{DIVIDER}",
        matches.len(),
        plural,
        query,
        matches.join("\n")
    )
}

/// Verbose instructions block for the HELP action.
pub fn help_block() -> String {
    let mut result = String::new();
    result.push_str(DIVIDER);
    result.push('\n');
    result.push_str("[ HELP ]\n\n");
    result.push_str("  Send a server request via '<action> <filename> <data>'\n");
    result.push_str("    > action = write, read, append, delete, find\n");
    result.push_str("    > filename = the file name\n");
    result.push_str("    > data = the data to write\n");
    result.push_str("  Examples:\n");
    result.push_str("    > write file.txt hello world\n");
    result.push_str("        Creates file.txt with the data 'hello world'\n");
    result.push_str("    > read file.txt\n");
    result.push_str("        Displays contents of file.txt\n");
    result.push_str("    > append file.txt goodbye world\n");
    result.push_str("        Adds 'goodbye world' to the end of file.txt\n");
    result.push_str("    > delete file.txt\n");
    result.push_str("        Deletes file.txt\n");
    result.push_str("    > find .txt\n");
    result.push_str("        Displays files with names containing '.txt'\n");
    result.push_str(DIVIDER);
    result
}

/// Response to a server-received QUIT: disconnecting is client-initiated,
/// the server performs no action.
pub fn quit_notice() -> String {
    "> QUIT is handled by your client; close the connection to disconnect.".to_string()
}
