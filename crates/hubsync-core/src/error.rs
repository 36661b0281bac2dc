//! Error types for hubsync-core

use serde::Serialize;

use hubsync_fs::NormalizedPath;

/// Result type for hubsync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in hubsync-core operations
///
/// Configuration and setup errors abort a run before any file is synced.
/// Everything else is scoped to a single file and ends up in that file's
/// [`Outcome`](crate::Outcome).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Missing or invalid configuration, unknown kind directory
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Two records for the same local path
    #[error("Duplicate manifest record for {path}")]
    DuplicateRecord { path: NormalizedPath },

    /// Package tree could not be walked
    #[error("Failed to scan package: {0}")]
    Scan(#[from] walkdir::Error),

    /// Filesystem watch could not be set up
    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),

    /// Config file could not be loaded
    #[error(transparent)]
    Fs(#[from] hubsync_fs::Error),

    /// The hub could not be reached or refused to answer
    #[error("Hub unavailable: {source}")]
    RemoteUnavailable {
        #[source]
        source: hubsync_remote::Error,
    },

    /// The hub answered with something unparseable
    #[error("Malformed hub response: {message}")]
    RemoteMalformedResponse { message: String },

    /// The hub accepted the request but reported a failure
    #[error("{message}")]
    RemoteReportedError { message: String },

    #[error("Cannot read {path}: {source}")]
    LocalFileUnreadable {
        path: NormalizedPath,
        #[source]
        source: hubsync_fs::Error,
    },

    #[error("Cannot write {path}: {source}")]
    LocalFileUnwritable {
        path: NormalizedPath,
        #[source]
        source: hubsync_fs::Error,
    },
}

/// Classification of a per-file failure, as reported in outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    RemoteUnavailable,
    RemoteMalformedResponse,
    RemoteReportedError,
    LocalFileUnreadable,
    LocalFileUnwritable,
}

impl Error {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// True for errors that abort the whole run.
    pub fn is_fatal(&self) -> bool {
        self.failure_kind().is_none()
    }

    /// The per-file classification, or `None` for fatal errors.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::RemoteUnavailable { .. } => Some(FailureKind::RemoteUnavailable),
            Self::RemoteMalformedResponse { .. } => Some(FailureKind::RemoteMalformedResponse),
            Self::RemoteReportedError { .. } => Some(FailureKind::RemoteReportedError),
            Self::LocalFileUnreadable { .. } => Some(FailureKind::LocalFileUnreadable),
            Self::LocalFileUnwritable { .. } => Some(FailureKind::LocalFileUnwritable),
            Self::Configuration { .. }
            | Self::DuplicateRecord { .. }
            | Self::Scan(_)
            | Self::Watch(_)
            | Self::Fs(_) => None,
        }
    }
}

impl From<hubsync_remote::Error> for Error {
    fn from(error: hubsync_remote::Error) -> Self {
        match error {
            hubsync_remote::Error::UnknownKind { name } => {
                Self::configuration(format!("unknown resource kind '{}'", name))
            }
            hubsync_remote::Error::MalformedResponse { url, message } => {
                Self::RemoteMalformedResponse {
                    message: format!("{}: {}", url, message),
                }
            }
            other => Self::RemoteUnavailable { source: other },
        }
    }
}
