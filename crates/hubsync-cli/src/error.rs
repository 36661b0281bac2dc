//! Error types for hubsync-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from hubsync-core
    #[error(transparent)]
    Core(#[from] hubsync_core::Error),

    /// Error from hubsync-remote
    #[error(transparent)]
    Remote(#[from] hubsync_remote::Error),

    /// Error from hubsync-fs
    #[error(transparent)]
    Fs(#[from] hubsync_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON output error
    #[error("Could not render JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A run completed, but some records failed
    #[error("{failed} of {total} records failed")]
    SyncFailed { failed: usize, total: usize },

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
