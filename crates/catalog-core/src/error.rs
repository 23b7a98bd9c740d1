use thiserror::Error;

/// Application-wide error types for catalog-sync.
#[derive(Error, Debug)]
pub enum AppError {
    /// An upstream catalog or stock read answered with status >= 400.
    /// The message carries only the status code.
    #[error("Error: {status}")]
    Upstream { status: u16, url: String },

    /// HTTP request failed below the status layer (bad body, protocol error).
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Request timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Network/connection error.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// A decoded record could not be normalized.
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// Database operation failed.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Invalid configuration.
    #[error("Config error: {0}")]
    ConfigError(String),
}

impl AppError {
    /// HTTP status of an upstream rejection, if this is one.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            AppError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}
