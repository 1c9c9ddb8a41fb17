//! Resource trait for declarative state management
//!
//! A Resource is something on the server that should be present or
//! absent, can be observed, and can be created or removed.

use crate::error::{Error, Result};
use crate::inspect;
use crate::quote::{Identifier, IdentifierKind, quote_identifier};
use crate::session::Session;
use crate::types::{DesiredState, ObservedState};
use std::fmt;

/// Core trait for declarative resources
pub trait Resource: fmt::Debug {
    /// Identifier reported back to the caller (the name as supplied)
    fn id(&self) -> String;

    /// Resource type category, e.g. "database"
    fn resource_type(&self) -> &'static str;

    /// Get the desired state for this resource
    fn desired_state(&self) -> DesiredState;

    /// Query the server for the current state
    fn current_state(&self, session: &mut dyn Session) -> Result<ObservedState>;

    /// Bring the resource into existence
    fn create(&self, session: &mut dyn Session) -> Result<()>;

    /// Remove the resource
    fn remove(&self, session: &mut dyn Session) -> Result<()>;
}

/// A database on a PostgreSQL-protocol server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Database {
    name: String,
    identifier: Identifier,
    desired: DesiredState,
}

impl Database {
    /// Validate `name` as a database identifier.
    ///
    /// Fails with [`Error::Validation`] before anything touches the server.
    pub fn new(name: &str, desired: DesiredState) -> Result<Self> {
        let identifier = quote_identifier(name, IdentifierKind::Database)?;
        Ok(Self {
            name: name.to_string(),
            identifier,
            desired,
        })
    }

    pub fn present(name: &str) -> Result<Self> {
        Self::new(name, DesiredState::Present)
    }

    pub fn absent(name: &str) -> Result<Self> {
        Self::new(name, DesiredState::Absent)
    }

    pub fn create_statement(&self) -> String {
        format!("CREATE DATABASE {}", self.identifier.quoted())
    }

    pub fn drop_statement(&self) -> String {
        format!("DROP DATABASE {}", self.identifier.quoted())
    }

    fn run(&self, session: &mut dyn Session, statement: &str) -> Result<()> {
        session
            .execute(statement)
            .map(|_| ())
            .map_err(|e| Error::execution(statement, e))
    }
}

impl Resource for Database {
    fn id(&self) -> String {
        self.name.clone()
    }

    fn resource_type(&self) -> &'static str {
        "database"
    }

    fn desired_state(&self) -> DesiredState {
        self.desired
    }

    fn current_state(&self, session: &mut dyn Session) -> Result<ObservedState> {
        inspect::observe(session, &self.identifier)
    }

    fn create(&self, session: &mut dyn Session) -> Result<()> {
        self.run(session, &self.create_statement())
    }

    fn remove(&self, session: &mut dyn Session) -> Result<()> {
        self.run(session, &self.drop_statement())
    }
}
