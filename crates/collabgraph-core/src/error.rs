use thiserror::Error;

#[derive(Error, Debug)]
pub enum CollabGraphError {
    #[error("subject not found: {0}")]
    SubjectNotFound(String),

    #[error("source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("persistence error: {0}")]
    Persistence(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid operation: {0}")]
    InvalidOperation(String),
}

impl CollabGraphError {
    /// Whether the orchestrator may absorb this error and keep going.
    /// Only a missing subject aborts a synthesis run.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, CollabGraphError::SubjectNotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, CollabGraphError>;
