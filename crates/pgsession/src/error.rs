//! Error types for session establishment

use converge::SessionError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while opening a session
#[derive(Debug, Error)]
pub enum ConnectError {
    /// The blocking I/O runtime could not be started
    #[error("failed to start I/O runtime: {0}")]
    Runtime(#[source] std::io::Error),

    /// `ssl_root_cert` points at a missing file
    #[error("SSL root certificate not found: {}", .0.display())]
    RootCertNotFound(PathBuf),

    /// Driver failure: unreachable host, bad credentials, TLS negotiation
    #[error("{0}")]
    Driver(#[from] sqlx::Error),
}

impl From<ConnectError> for converge::Error {
    fn from(err: ConnectError) -> Self {
        converge::Error::connection(err)
    }
}

/// Keep the server's message and SQLSTATE when there is one
pub(crate) fn session_error(err: sqlx::Error) -> SessionError {
    match &err {
        sqlx::Error::Database(db) => {
            let session_err = SessionError::new(db.message());
            match db.code() {
                Some(code) => session_err.with_sqlstate(code),
                None => session_err,
            }
        }
        _ => SessionError::new(err.to_string()),
    }
}
