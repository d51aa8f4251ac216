//! Error types for config-reloader.

use std::path::PathBuf;

/// Result type alias for config-reloader operations.
pub type Result<T> = std::result::Result<T, ReloaderError>;

/// How an error affects the watch loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The loop could not be started.
    Setup,
    /// A cycle failed; the loop halts without committing the digest.
    Cycle,
    /// The filesystem observer reported a problem; logged and skipped.
    Observer,
    /// Cancellation interrupted a cycle that was in flight.
    Interrupted,
}

/// Errors that can occur while watching and reloading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ReloaderError {
    /// The supplied settings are unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The filesystem observer could not be created or could not register a path.
    #[error("Failed to set up file watching: {0}")]
    WatchSetup(String),

    /// The HTTP client could not be constructed.
    #[error("Failed to create HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// A path under the watch target could not be resolved, opened, or read.
    #[error("Failed to read {}: {source}", .path.display())]
    Digest {
        /// Path that failed
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// An entry resolved to something that is neither a file nor a directory.
    #[error("Unsupported entry in watch target: {}", .0.display())]
    UnsupportedEntry(PathBuf),

    /// The blocking digest task did not complete.
    #[error("Digest task failed: {0}")]
    DigestTask(String),

    /// The reload endpoint answered with something other than 200.
    #[error("Received non-200 response from reload endpoint: {status}")]
    ReloadStatus {
        /// Status returned by the endpoint
        status: reqwest::StatusCode,
    },

    /// The reload request did not complete (connection, DNS, timeout).
    #[error("Reload request failed: {0}")]
    ReloadRequest(#[source] reqwest::Error),

    /// The filesystem observer reported an internal error.
    #[error("File watch error: {0}")]
    Observer(String),

    /// Cancellation arrived while a reload request was in flight.
    #[error("Reload cancelled")]
    Cancelled,
}

impl ReloaderError {
    /// Build a digest error for `path`.
    pub(crate) fn digest(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Digest {
            path: path.into(),
            source,
        }
    }

    /// Classify the error by its effect on the watch loop.
    pub fn classify(&self) -> ErrorClass {
        match self {
            Self::InvalidConfig(_) | Self::WatchSetup(_) | Self::HttpClient(_) => {
                ErrorClass::Setup
            }
            Self::Digest { .. }
            | Self::UnsupportedEntry(_)
            | Self::DigestTask(_)
            | Self::ReloadStatus { .. }
            | Self::ReloadRequest(_) => ErrorClass::Cycle,
            Self::Observer(_) => ErrorClass::Observer,
            Self::Cancelled => ErrorClass::Interrupted,
        }
    }

    /// Whether the error should terminate the process.
    pub fn is_fatal(&self) -> bool {
        matches!(self.classify(), ErrorClass::Setup | ErrorClass::Cycle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_setup() {
        let err = ReloaderError::InvalidConfig("bad".to_string());
        assert_eq!(err.classify(), ErrorClass::Setup);
        assert!(err.is_fatal());

        let err = ReloaderError::WatchSetup("no inotify".to_string());
        assert_eq!(err.classify(), ErrorClass::Setup);
    }

    #[test]
    fn test_classify_cycle() {
        let err = ReloaderError::digest(
            "/etc/app/config.yaml",
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        );
        assert_eq!(err.classify(), ErrorClass::Cycle);
        assert!(err.is_fatal());
        assert!(err.to_string().contains("/etc/app/config.yaml"));

        let err = ReloaderError::ReloadStatus {
            status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
        };
        assert_eq!(err.classify(), ErrorClass::Cycle);
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_non_fatal_classes() {
        let err = ReloaderError::Observer("queue overflow".to_string());
        assert_eq!(err.classify(), ErrorClass::Observer);
        assert!(!err.is_fatal());

        assert_eq!(ReloaderError::Cancelled.classify(), ErrorClass::Interrupted);
        assert!(!ReloaderError::Cancelled.is_fatal());
    }
}
