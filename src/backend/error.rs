use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Errors raised by concrete backend adapters.
pub enum BackendError {
    /// The named backend kind is not registered.
    #[error("unknown cache backend kind: {kind}")]
    UnknownKind {
        /// The kind that was requested.
        kind: String,
    },

    /// The backend could not be reached or refused the request.
    #[error("backend unavailable: {reason}")]
    Unavailable {
        /// Error message.
        reason: String,
    },

    /// The backend failed mid-operation.
    #[error("backend io error: {reason}")]
    Io {
        /// Error message.
        reason: String,
    },
}

/// Convenience result type for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;
