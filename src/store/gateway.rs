//! File operation gateway.
//!
//! All operations resolve paths by raw concatenation of the storage root
//! and the client-supplied filename token. No normalization or traversal
//! protection is applied; this is a documented limitation of the protocol,
//! and the service is intended to run against a dedicated directory with a
//! trusted client.

use std::path::PathBuf;

use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::error::ServerError;

/// Result of one file operation, carrying content or a client-facing
/// failure reason. Filesystem faults never escape as errors; they are
/// translated here and reported per operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationOutcome {
    Success { data: Option<String> },
    Failure { reason: String },
}

impl OperationOutcome {
    /// Create a success outcome with data.
    pub fn success(data: impl Into<String>) -> Self {
        Self::Success {
            data: Some(data.into()),
        }
    }

    /// Create a success outcome with no data.
    pub fn success_empty() -> Self {
        Self::Success { data: None }
    }

    /// Create a failure outcome.
    pub fn failure(reason: impl Into<String>) -> Self {
        Self::Failure {
            reason: reason.into(),
        }
    }

    /// Whether the operation succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Gateway to the server-managed directory.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a gateway over an existing directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create a gateway, creating the root directory if missing.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, ServerError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| ServerError::Config {
                message: format!(
                    "Failed to create storage root '{}': {}",
                    root.display(),
                    e
                ),
            })?;
        Ok(Self { root })
    }

    /// The configured storage root.
    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    /// Join the root and the raw filename token.
    ///
    /// The name is appended verbatim, matching the documented
    /// no-sanitization contract of the protocol.
    fn resolve(&self, filename: &str) -> PathBuf {
        let mut path = self.root.as_os_str().to_os_string();
        path.push("/");
        path.push(filename);
        PathBuf::from(path)
    }

    /// Read the entire content of a file.
    pub async fn read(&self, filename: &str) -> OperationOutcome {
        let path = self.resolve(filename);
        debug!(path = %path.display(), "Reading file");

        match tokio::fs::read_to_string(&path).await {
            Ok(data) => OperationOutcome::success(data),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Read failed");
                OperationOutcome::failure(format!(
                    "File '{filename}' does not exist on the server!"
                ))
            }
        }
    }

    /// Create or truncate a file with the given payload.
    pub async fn write(&self, filename: &str, payload: &str) -> OperationOutcome {
        let path = self.resolve(filename);
        debug!(path = %path.display(), bytes = payload.len(), "Writing file");

        match tokio::fs::write(&path, payload).await {
            Ok(()) => OperationOutcome::success_empty(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Write failed");
                OperationOutcome::failure("An error occurred while writing to the file.")
            }
        }
    }

    /// Append the payload to a file, creating it if absent.
    pub async fn append(&self, filename: &str, payload: &str) -> OperationOutcome {
        let path = self.resolve(filename);
        debug!(path = %path.display(), bytes = payload.len(), "Appending to file");

        let result = async {
            let mut file = tokio::fs::OpenOptions::new()
                .append(true)
                .create(true)
                .open(&path)
                .await?;
            file.write_all(payload.as_bytes()).await?;
            file.flush().await?;
            Ok::<(), std::io::Error>(())
        }
        .await;

        match result {
            Ok(()) => OperationOutcome::success_empty(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Append failed");
                OperationOutcome::failure("An error occurred while appending to the file.")
            }
        }
    }

    /// Remove a file.
    pub async fn delete(&self, filename: &str) -> OperationOutcome {
        let path = self.resolve(filename);
        debug!(path = %path.display(), "Deleting file");

        match tokio::fs::remove_file(&path).await {
            Ok(()) => OperationOutcome::success_empty(),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Delete failed");
                OperationOutcome::failure(format!(
                    "File '{filename}' does not exist on the server!"
                ))
            }
        }
    }

    /// List entries directly in the root whose raw name contains the
    /// pattern, case-sensitively. The outcome data holds one matching name
    /// per line; zero matches is a success with empty data.
    pub async fn find(&self, pattern: &str) -> OperationOutcome {
        debug!(root = %self.root.display(), pattern, "Searching directory");

        let failure =
            || OperationOutcome::failure("An error occurred while searching for the file.");

        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(root = %self.root.display(), error = %e, "Directory read failed");
                return failure();
            }
        };

        let mut matches = Vec::new();
        loop {
            match entries.next_entry().await {
                Ok(Some(entry)) => {
                    let name = entry.file_name().to_string_lossy().into_owned();
                    if name.contains(pattern) {
                        matches.push(name);
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    warn!(root = %self.root.display(), error = %e, "Directory read failed");
                    return failure();
                }
            }
        }

        matches.sort();
        OperationOutcome::success(matches.join("\n"))
    }
}
