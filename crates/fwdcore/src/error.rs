use thiserror::Error;

/// Failure to read or write the store document.
///
/// Any operation that returns this error has left the persisted state exactly
/// as it was before the operation started.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Filesystem errors (paths are included by `fs-err`)
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document exists but is not a valid store
    #[error("Store document is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Callback payload that does not match the button grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unknown callback action: {0:?}")]
    UnknownAction(String),

    #[error("invalid target id in callback payload: {0:?}")]
    InvalidTarget(String),
}

/// Type alias for store results
pub type StoreResult<T> = Result<T, PersistenceError>;
