//! Session error types

use thiserror::Error;

use crate::api::ApiError;

/// Errors returned by the session store
#[derive(Error, Debug)]
pub enum SessionError {
    /// The identity service rejected the call; its message is kept as is
    #[error(transparent)]
    Identity(#[from] ApiError),

    /// The issued token could not be persisted
    #[error("Failed to persist session: {0}")]
    Storage(#[from] TokenStoreError),
}

/// Errors from the persisted token slot
#[derive(Error, Debug)]
pub enum TokenStoreError {
    /// Reading or writing the token file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The token file is not valid JSON
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for TokenStoreError {
    fn from(err: serde_json::Error) -> Self {
        TokenStoreError::Serialization(err.to_string())
    }
}

/// Result type alias for session operations
pub type SessionResult<T> = Result<T, SessionError>;
