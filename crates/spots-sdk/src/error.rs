use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("index {index} out of range for {len} items")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("stale reconciliation: {0}")]
    StaleReconciliation(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(#[from] spots_store::StoreError),

    #[error("type error: {0}")]
    Type(#[from] spots_types::TypeError),
}

pub type SdkResult<T> = Result<T, SdkError>;
