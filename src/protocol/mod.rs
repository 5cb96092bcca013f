//! Wire protocol module.
//!
//! Defines command parsing, validation, response rendering, and line
//! framing for the TCP protocol.
//!
//! ## Wire Format
//!
//! Client to server: one command per newline-terminated line,
//! `<action> [<filename>] [<data...>]`. Server to client: free-form text
//! blocks, each followed by the standard prompt.

mod command;
mod response;
mod validate;
mod wire;

pub use command::{parse, Action, Command};
pub use response::{
    ack_line, banner, error_line, failure_block, find_block, help_block, prompt, quit_notice,
    read_block, success_block, DIVIDER,
};
pub use validate::{validate, ValidationResult, KNOWN_ACTIONS};
pub use wire::{read_line, write_line};
