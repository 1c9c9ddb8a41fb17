//! Session capability
//!
//! The reconciler only needs two things from a database client: run a
//! parameterized read query, and run a statement. Anything that can do both
//! over one blocking session implements [`Session`].

use thiserror::Error;

/// One result row, every column read as text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    columns: Vec<Option<String>>,
}

impl Row {
    pub fn new(columns: Vec<Option<String>>) -> Self {
        Self { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Failure reported by the session, kept as the backend phrased it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}{}", .sqlstate.as_ref().map(|c| format!(" (SQLSTATE {c})")).unwrap_or_default())]
pub struct SessionError {
    /// Driver or server message
    pub message: String,
    /// Five-character SQLSTATE code when the server reported one
    pub sqlstate: Option<String>,
}

impl SessionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            sqlstate: None,
        }
    }

    pub fn with_sqlstate(mut self, code: impl Into<String>) -> Self {
        self.sqlstate = Some(code.into());
        self
    }
}

/// An open, authenticated, blocking session
///
/// Implementations are not expected to be shared between threads; each
/// reconciliation owns its session for the duration of the call.
pub trait Session {
    /// Whether each statement commits on its own
    ///
    /// Database DDL cannot run inside a transaction block, so sessions
    /// used for creation or deletion should be established in autocommit
    /// mode.
    fn autocommit(&self) -> bool {
        true
    }

    /// Run a read query with positional text parameters (`$1`, `$2`, ...)
    fn query(&mut self, sql: &str, params: &[&str]) -> Result<Vec<Row>, SessionError>;

    /// Run a statement without parameters and return the rows affected
    fn execute(&mut self, sql: &str) -> Result<u64, SessionError>;
}

impl<S: Session + ?Sized> Session for &mut S {
    fn autocommit(&self) -> bool {
        (**self).autocommit()
    }

    fn query(&mut self, sql: &str, params: &[&str]) -> Result<Vec<Row>, SessionError> {
        (**self).query(sql, params)
    }

    fn execute(&mut self, sql: &str) -> Result<u64, SessionError> {
        (**self).execute(sql)
    }
}

impl<S: Session + ?Sized> Session for Box<S> {
    fn autocommit(&self) -> bool {
        (**self).autocommit()
    }

    fn query(&mut self, sql: &str, params: &[&str]) -> Result<Vec<Row>, SessionError> {
        (**self).query(sql, params)
    }

    fn execute(&mut self, sql: &str) -> Result<u64, SessionError> {
        (**self).execute(sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_error_display() {
        assert_eq!(SessionError::new("boom").to_string(), "boom");
        assert_eq!(
            SessionError::new("database \"acme\" already exists")
                .with_sqlstate("42P04")
                .to_string(),
            "database \"acme\" already exists (SQLSTATE 42P04)"
        );
    }

    #[test]
    fn test_row_access() {
        let row = Row::new(vec![Some("acme".into()), None]);
        assert_eq!(row.len(), 2);
        assert!(Row::default().is_empty());
    }
}
