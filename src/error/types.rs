//! Error types for the filedock daemon.
//!
//! Filesystem failures during command execution are deliberately not
//! represented here: they are recovered per operation and reported to the
//! client as failure blocks, never as session faults.

use thiserror::Error;

/// Main error type for the daemon.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Configuration-related errors.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Listener errors. Bind failures are fatal at startup.
    #[error("Listener error: {message}")]
    Listener { message: String },

    /// Protocol errors.
    #[error("Protocol error: {kind}")]
    Protocol { kind: ProtocolErrorKind },

    /// I/O errors on the connection.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Protocol error kinds.
#[derive(Error, Debug)]
pub enum ProtocolErrorKind {
    /// The peer closed the connection.
    #[error("Connection closed")]
    ConnectionClosed,

    /// A command line exceeded the configured limit.
    #[error("Line too long: {size} bytes exceeds maximum of {max} bytes")]
    LineTooLong { size: usize, max: usize },
}

/// Result type alias for daemon operations.
pub type ServerResult<T> = Result<T, ServerError>;
