use thiserror::Error;

#[derive(Debug, Error)]
pub enum OfflineError {
    #[error("Store error: {0}")]
    Store(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Corrupt entry: {0}")]
    Corrupt(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Network unavailable: {0}")]
    Network(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for OfflineError {
    fn from(err: sqlx::Error) -> Self {
        OfflineError::Store(err.to_string())
    }
}

impl From<serde_json::Error> for OfflineError {
    fn from(err: serde_json::Error) -> Self {
        OfflineError::Serialization(err.to_string())
    }
}

impl From<String> for OfflineError {
    fn from(err: String) -> Self {
        OfflineError::Internal(err)
    }
}

pub type Result<T> = std::result::Result<T, OfflineError>;
