//! Configuration module.

mod settings;

pub use settings::{LimitsConfig, ListenConfig, LoggingConfig, Settings, StorageConfig};
