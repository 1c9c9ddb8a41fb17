//! State inspection: does a named database currently exist?
//!
//! Read-only. The answer is taken fresh from the catalog on every call.
//!
//! Names are compared exactly. Redshift folds quoted identifiers to lower
//! case unless `downcase_delimited_identifier` is off, so mixed-case names
//! are not found there after creation.

use crate::error::{Error, Result};
use crate::quote::Identifier;
use crate::session::Session;
use crate::types::ObservedState;

/// Catalog lookup by exact name, bound as a value
pub const EXISTS_QUERY: &str = "SELECT datname FROM pg_database WHERE datname = $1";

/// Check whether exactly one database named `identifier` exists.
///
/// Zero rows is `false`, one row is `true`. More rows than that cannot
/// happen under the catalog's uniqueness constraint and is reported as
/// [`Error::InconsistentState`].
pub fn exists<S: Session + ?Sized>(session: &mut S, identifier: &Identifier) -> Result<bool> {
    let name = identifier.catalog_name();
    let rows = session
        .query(EXISTS_QUERY, &[name])
        .map_err(|e| Error::execution(EXISTS_QUERY, e))?;

    match rows.len() {
        0 => Ok(false),
        1 => Ok(true),
        matches => Err(Error::InconsistentState {
            name: name.to_string(),
            matches,
        }),
    }
}

/// Observe the current state of a database
pub fn observe<S: Session + ?Sized>(
    session: &mut S,
    identifier: &Identifier,
) -> Result<ObservedState> {
    exists(session, identifier).map(ObservedState::from_exists)
}
