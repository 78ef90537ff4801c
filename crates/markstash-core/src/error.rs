//! Engine error taxonomy
//!
//! Every engine operation returns [`Result`]. The variants line up with
//! how a caller should react: fix the input, look elsewhere, or give up.

use thiserror::Error;

use crate::storage::StorageError;

/// Errors returned by engine operations
#[derive(Error, Debug)]
pub enum Error {
    /// Required input missing or malformed
    #[error("{0}")]
    Validation(String),

    /// Referenced domain, path or key does not exist
    #[error("{0}")]
    NotFound(String),

    /// A stored value could not be parsed (or produced)
    #[error("Corrupt record under '{key}': {source}")]
    Integrity {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Transport-level failure talking to the backing store
    #[error("Backing store error: {0}")]
    Storage(#[from] StorageError),
}

impl Error {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        Error::NotFound(message.into())
    }

    pub(crate) fn integrity(key: impl Into<String>, source: serde_json::Error) -> Self {
        Error::Integrity {
            key: key.into(),
            source,
        }
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, Error>;
