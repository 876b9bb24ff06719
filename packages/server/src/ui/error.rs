//! Server startup and runtime errors.

use thiserror::Error;

use crate::domain::{AuthError, RepositoryError};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),

    #[error("storage initialization failed: {0}")]
    Storage(#[from] RepositoryError),

    #[error("token issuance failed: {0}")]
    Token(#[from] AuthError),
}
