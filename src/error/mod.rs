//! Error handling module.

mod types;

pub use types::{ProtocolErrorKind, ServerError, ServerResult};
