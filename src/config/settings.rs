//! Configuration settings for the filedock daemon.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::ServerError;

/// Main configuration structure for the daemon.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub listen: ListenConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// TCP listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ListenConfig {
    /// Address to bind.
    #[serde(default = "default_listen_addr")]
    pub addr: String,
    /// Port to bind. Exactly one listener per port.
    #[serde(default = "default_listen_port")]
    pub port: u16,
}

/// File storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Root directory all file operations are resolved against.
    /// Created at startup if missing.
    #[serde(default = "default_storage_root")]
    pub root: PathBuf,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format ("pretty" or "json").
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Optional log file path.
    pub file: Option<PathBuf>,
}

/// Limits configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Maximum command line length in bytes.
    #[serde(default = "default_max_line_bytes")]
    pub max_line_bytes: usize,
    /// Maximum concurrent client connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
    /// Delay before re-sending the prompt after a response, in milliseconds.
    #[serde(default = "default_prompt_delay_ms")]
    pub prompt_delay_ms: u64,
}

// Default value functions
fn default_listen_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_listen_port() -> u16 {
    3001
}

fn default_storage_root() -> PathBuf {
    PathBuf::from("./server-files")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_max_line_bytes() -> usize {
    65_536
}

fn default_max_connections() -> usize {
    100
}

fn default_prompt_delay_ms() -> u64 {
    10
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            addr: default_listen_addr(),
            port: default_listen_port(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_storage_root(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_line_bytes: default_max_line_bytes(),
            max_connections: default_max_connections(),
            prompt_delay_ms: default_prompt_delay_ms(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            listen: ListenConfig::default(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
            limits: LimitsConfig::default(),
        }
    }
}

impl ListenConfig {
    /// The bind address in `addr:port` form.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.addr, self.port)
    }
}

impl Settings {
    /// Load settings from a TOML configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ServerError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ServerError::Config {
            message: format!("Failed to read config file '{}': {}", path.display(), e),
        })?;

        let settings: Settings = toml::from_str(&content).map_err(|e| ServerError::Config {
            message: format!("Failed to parse config file '{}': {}", path.display(), e),
        })?;

        settings.validate()?;

        Ok(settings)
    }

    /// Validate the settings.
    pub fn validate(&self) -> Result<(), ServerError> {
        // Validate log level
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ServerError::Config {
                message: format!(
                    "Invalid log level '{}'. Valid levels: {:?}",
                    self.logging.level, valid_levels
                ),
            });
        }

        // Validate log format
        let valid_formats = ["pretty", "json"];
        if !valid_formats.contains(&self.logging.format.to_lowercase().as_str()) {
            return Err(ServerError::Config {
                message: format!(
                    "Invalid log format '{}'. Valid formats: {:?}",
                    self.logging.format, valid_formats
                ),
            });
        }

        if self.limits.max_line_bytes == 0 {
            return Err(ServerError::Config {
                message: "max_line_bytes must be greater than zero".to_string(),
            });
        }

        if self.limits.max_connections == 0 {
            return Err(ServerError::Config {
                message: "max_connections must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let settings = Settings::default();
        assert_eq!(settings.listen.port, 3001);
        assert_eq!(settings.storage.root, PathBuf::from("./server-files"));
        assert_eq!(settings.logging.level, "info");
        assert_eq!(settings.logging.format, "pretty");
        assert_eq!(settings.limits.prompt_delay_ms, 10);
    }

    #[test]
    fn test_socket_addr() {
        let listen = ListenConfig {
            addr: "127.0.0.1".to_string(),
            port: 3001,
        };
        assert_eq!(listen.socket_addr(), "127.0.0.1:3001");
    }

    #[test]
    fn test_parse_partial_config() {
        let settings: Settings = toml::from_str(
            r#"
            [listen]
            port = 4000

            [storage]
            root = "/srv/files"
            "#,
        )
        .unwrap();

        assert_eq!(settings.listen.port, 4000);
        assert_eq!(settings.listen.addr, "0.0.0.0");
        assert_eq!(settings.storage.root, PathBuf::from("/srv/files"));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_level() {
        let mut settings = Settings::default();
        settings.logging.level = "loud".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_limits() {
        let mut settings = Settings::default();
        settings.limits.max_line_bytes = 0;
        assert!(settings.validate().is_err());
    }
}
