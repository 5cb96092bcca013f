//! Command dispatch module.
//!
//! Orchestrates parse, validate, execute, and respond for each inbound
//! command line.

mod dispatcher;

pub use dispatcher::Dispatcher;
