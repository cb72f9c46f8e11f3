use thiserror::Error;

/// Error types
#[derive(Debug, Error)]
pub enum Error {
    #[error("scrutin: invalid argument: {0}")]
    InvalidArgument(String),

    #[error("scrutin: {0} already exists")]
    AlreadyExists(String),

    #[error("scrutin: {0} not found")]
    NotFound(String),

    #[error("scrutin: store failure: {0}")]
    StoreFailure(#[from] StoreError),

    #[error("scrutin: received unknown function {0}")]
    UnknownFunction(String),

    #[error("scrutin: JSON error encoding record: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// A failure reported by the underlying key-value store.
///
/// This is distinct from a key being absent, which stores report as `Ok(None)`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{op} {key}: {reason}")]
pub struct StoreError {
    pub op: StoreOp,
    pub key: String,
    pub reason: String,
}

impl StoreError {
    pub fn get(key: &str, reason: impl Into<String>) -> Self {
        StoreError {
            op: StoreOp::Get,
            key: key.to_owned(),
            reason: reason.into(),
        }
    }

    pub fn put(key: &str, reason: impl Into<String>) -> Self {
        StoreError {
            op: StoreOp::Put,
            key: key.to_owned(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Get,
    Put,
}

impl std::fmt::Display for StoreOp {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            StoreOp::Get => write!(f, "failed to get state for"),
            StoreOp::Put => write!(f, "failed to put state for"),
        }
    }
}
