use spots_types::TypeError;

/// Errors from component cache operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The key is empty or contains characters not allowed in a cache key.
    #[error("invalid cache key: {0:?}")]
    InvalidKey(String),

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<TypeError> for StoreError {
    fn from(err: TypeError) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Result alias for cache operations.
pub type StoreResult<T> = Result<T, StoreError>;
