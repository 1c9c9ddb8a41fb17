//! In-memory session double for tests

use crate::inspect::EXISTS_QUERY;
use crate::session::{Row, Session, SessionError};
use std::collections::BTreeSet;

/// Catalog of database names that understands the statements the
/// reconciler issues, and records everything it receives.
#[derive(Debug, Default)]
pub struct FakeSession {
    databases: BTreeSet<String>,
    queries: Vec<(String, Vec<String>)>,
    statements: Vec<String>,
    duplicate_rows: Option<usize>,
    query_failure: Option<String>,
    statement_failure: Option<SessionError>,
    read_only: bool,
    manual_commit: bool,
}

impl FakeSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_databases<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            databases: names.into_iter().map(str::to_string).collect(),
            ..Self::default()
        }
    }

    /// Report `n` catalog rows for every lookup
    pub fn duplicate_rows(mut self, n: usize) -> Self {
        self.duplicate_rows = Some(n);
        self
    }

    pub fn fail_queries(mut self, message: &str) -> Self {
        self.query_failure = Some(message.to_string());
        self
    }

    pub fn fail_statements(mut self, err: SessionError) -> Self {
        self.statement_failure = Some(err);
        self
    }

    /// Panic on any mutating statement
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn without_autocommit(mut self) -> Self {
        self.manual_commit = true;
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.databases.contains(name)
    }

    pub fn queries(&self) -> &[(String, Vec<String>)] {
        &self.queries
    }

    pub fn statements(&self) -> &[String] {
        &self.statements
    }
}

fn unquote(ident: &str) -> String {
    ident
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(ident)
        .replace("\"\"", "\"")
}

impl Session for FakeSession {
    fn autocommit(&self) -> bool {
        !self.manual_commit
    }

    fn query(&mut self, sql: &str, params: &[&str]) -> Result<Vec<Row>, SessionError> {
        self.queries.push((
            sql.to_string(),
            params.iter().map(ToString::to_string).collect(),
        ));

        if let Some(message) = &self.query_failure {
            return Err(SessionError::new(message.clone()).with_sqlstate("57P01"));
        }
        assert_eq!(sql, EXISTS_QUERY, "unexpected query");

        let name = params.first().copied().unwrap_or_default();
        let matches = match self.duplicate_rows {
            Some(n) => n,
            None => usize::from(self.databases.contains(name)),
        };
        Ok((0..matches)
            .map(|_| Row::new(vec![Some(name.to_string())]))
            .collect())
    }

    fn execute(&mut self, sql: &str) -> Result<u64, SessionError> {
        assert!(!self.read_only, "mutating statement in read-only session: {sql}");
        self.statements.push(sql.to_string());

        if let Some(err) = &self.statement_failure {
            return Err(err.clone());
        }
        if self.manual_commit {
            return Err(SessionError::new(
                "CREATE DATABASE cannot run inside a transaction block",
            )
            .with_sqlstate("25001"));
        }

        if let Some(ident) = sql.strip_prefix("CREATE DATABASE ") {
            let name = unquote(ident);
            if !self.databases.insert(name.clone()) {
                return Err(SessionError::new(format!("database \"{name}\" already exists"))
                    .with_sqlstate("42P04"));
            }
        } else if let Some(ident) = sql.strip_prefix("DROP DATABASE ") {
            let name = unquote(ident);
            if !self.databases.remove(&name) {
                return Err(SessionError::new(format!("database \"{name}\" does not exist"))
                    .with_sqlstate("3D000"));
            }
        } else {
            panic!("unexpected statement: {sql}");
        }
        Ok(0)
    }
}
