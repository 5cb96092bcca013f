//! File storage module.
//!
//! Performs the five file operations against the configured storage root.

mod gateway;

pub use gateway::{FileStore, OperationOutcome};
