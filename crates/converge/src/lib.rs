//! # Converge
//!
//! Declarative reconciliation of databases on a PostgreSQL-protocol server.
//!
//! Given a desired state ("database `acme` should exist" or "should not
//! exist"), the reconciler inspects the server, performs the single
//! statement needed to converge, and reports whether anything changed.
//!
//! ## Core Concepts
//!
//! - **Session**: a blocking query capability over one connection
//! - **Identifier**: a name made safe for interpolation as a schema object
//! - **Resource**: something that can be observed, created and removed
//! - **Outcome**: whether a change was (or in check mode would be) made
//!
//! ## Example
//!
//! ```ignore
//! use converge::{DesiredState, reconcile};
//!
//! let mut session = pgsession::connect(&options)?;
//! let outcome = reconcile(DesiredState::Present, "acme", false, &mut session)?;
//! assert_eq!(outcome.name, "acme");
//! ```
//!
//! The crate does no logging and owns no connection; callers provide the
//! [`Session`] and decide how to report the [`Outcome`] or [`Error`].

pub mod context;
pub mod error;
pub mod inspect;
pub mod quote;
pub mod reconcile;
pub mod resource;
pub mod session;
pub mod types;

#[cfg(test)]
mod fake;

// Re-export main types at crate root
pub use context::ApplyContext;
pub use error::{Error, ErrorKind, Result};
pub use inspect::{exists, observe};
pub use quote::{Identifier, IdentifierKind, QuoteError, quote_identifier};
pub use reconcile::{converge, reconcile};
pub use resource::{Database, Resource};
pub use session::{Row, Session, SessionError};
pub use types::{Action, DesiredState, ObservedState, Outcome};
