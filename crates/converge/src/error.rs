//! Error types for reconciliation.
//!
//! Every failure is one of four kinds so callers can tell bad input apart
//! from a backend that rejected the operation.

use crate::quote::QuoteError;
use crate::session::SessionError;
use std::fmt;
use thiserror::Error;

/// Category of a reconciliation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A session could not be established
    Connection,
    /// The resource name cannot be rendered as an identifier
    Validation,
    /// The backend rejected a statement
    Execution,
    /// The catalog reported more than one match for a unique name
    InconsistentState,
}

impl ErrorKind {
    /// Stable machine-readable name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connection => "connection",
            Self::Validation => "validation",
            Self::Execution => "execution",
            Self::InconsistentState => "inconsistent_state",
        }
    }

    /// Get a user-friendly description of this error category.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Connection => "Connection failed",
            Self::Validation => "Invalid database name",
            Self::Execution => "Statement rejected by server",
            Self::InconsistentState => "Inconsistent catalog state",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Errors that can occur while reconciling a database.
#[derive(Debug, Error)]
pub enum Error {
    /// Session establishment failed
    #[error("unable to connect to database: {message}")]
    Connection {
        /// Driver or server message, verbatim
        message: String,
    },

    /// Identifier quoting rejected the name
    #[error(transparent)]
    Validation(#[from] QuoteError),

    /// A statement failed on the server
    #[error("Database query failed: {source}")]
    Execution {
        /// The statement that failed
        statement: String,
        /// Backend error with SQLSTATE, if any
        #[source]
        source: SessionError,
    },

    /// More than one catalog row for a name that must be unique
    #[error("catalog lists {matches} databases named {name:?}, expected at most one")]
    InconsistentState {
        /// Catalog name that was looked up
        name: String,
        /// Number of rows returned
        matches: usize,
    },
}

impl Error {
    /// Get the error category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Connection { .. } => ErrorKind::Connection,
            Error::Validation(_) => ErrorKind::Validation,
            Error::Execution { .. } => ErrorKind::Execution,
            Error::InconsistentState { .. } => ErrorKind::InconsistentState,
        }
    }

    /// Wrap any connect failure, keeping its message verbatim.
    pub fn connection(err: impl fmt::Display) -> Self {
        Error::Connection {
            message: err.to_string(),
        }
    }

    pub(crate) fn execution(statement: &str, source: SessionError) -> Self {
        Error::Execution {
            statement: statement.to_string(),
            source,
        }
    }

    /// SQLSTATE reported by the server, when the error came from one.
    pub fn sqlstate(&self) -> Option<&str> {
        match self {
            Error::Execution { source, .. } => source.sqlstate.as_deref(),
            _ => None,
        }
    }
}

/// Result type for reconciliation.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(Error::connection("refused").kind(), ErrorKind::Connection);
        assert_eq!(
            Error::from(QuoteError::Empty).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            Error::execution("DROP DATABASE \"x\"", SessionError::new("boom")).kind(),
            ErrorKind::Execution
        );
        assert_eq!(
            Error::InconsistentState {
                name: "x".into(),
                matches: 2
            }
            .kind(),
            ErrorKind::InconsistentState
        );
    }

    #[test]
    fn test_execution_preserves_backend_detail() {
        let err = Error::execution(
            "CREATE DATABASE \"acme\"",
            SessionError::new("permission denied to create database").with_sqlstate("42501"),
        );
        assert_eq!(err.sqlstate(), Some("42501"));
        let msg = err.to_string();
        assert!(msg.starts_with("Database query failed: "));
        assert!(msg.contains("permission denied to create database"));
        assert!(msg.contains("42501"));
    }

    #[test]
    fn test_connection_message_is_verbatim() {
        let err = Error::connection("password authentication failed for user \"bob\"");
        assert_eq!(
            err.to_string(),
            "unable to connect to database: password authentication failed for user \"bob\""
        );
        assert_eq!(err.sqlstate(), None);
    }
}
