//! Error types for hubsync-remote

/// Result type for hubsync-remote operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur talking to the hub
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport-level failure: connection refused, timeout, reset
    #[error("Hub unavailable: {0}")]
    Unavailable(#[from] reqwest::Error),

    /// A read or listing answered with a non-success status
    #[error("Hub returned {status} for {url}")]
    Status { url: String, status: u16 },

    /// The body could not be parsed into the expected shape
    #[error("Malformed response from {url}: {message}")]
    MalformedResponse { url: String, message: String },

    /// A directory name or kind string that maps to no resource kind
    #[error("Unknown resource kind: {name}")]
    UnknownKind { name: String },
}

impl Error {
    /// True for failures that mean the hub could not be reached or refused
    /// to answer, as opposed to answering with something unparseable.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Status { .. })
    }
}
