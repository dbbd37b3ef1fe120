//! Lifecycle error definitions.

use thiserror::Error;

use crate::http::client::HttpError;

/// Errors that can occur during service lifecycle operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A bootstrap capability was invoked without a concrete implementation.
    #[error("{0} is not implemented")]
    Unimplemented(&'static str),

    /// The underlying server failed to close during teardown.
    #[error("server close failed: {0}")]
    Close(String),

    /// No server handle present where one is required.
    #[error("no server handle available")]
    NoServer,

    /// Failure on the registry HTTP path.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// I/O failure while creating or binding the server.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for lifecycle operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
