//! Reconciliation: observe once, plan, then act or predict

use crate::context::ApplyContext;
use crate::error::Result;
use crate::resource::{Database, Resource};
use crate::session::Session;
use crate::types::{Action, DesiredState, Outcome};

/// Converge a resource towards its desired state.
///
/// The current state is read immediately before acting. In a dry run the
/// planned action is reported and neither [`Resource::create`] nor
/// [`Resource::remove`] is called.
///
/// Check and act are not atomic: another client can create or drop the
/// same resource in between, in which case the server's error for the
/// statement is returned.
pub fn converge<R: Resource + ?Sized>(
    resource: &R,
    session: &mut dyn Session,
    ctx: &ApplyContext,
) -> Result<Outcome> {
    let observed = resource.current_state(session)?;
    let action = Action::plan(resource.desired_state(), observed);

    if ctx.dry_run {
        return Ok(Outcome::new(resource.id(), action, true));
    }

    match action {
        Action::None => {}
        Action::Create => resource.create(session)?,
        Action::Drop => resource.remove(session)?,
    }

    Ok(Outcome::new(resource.id(), action, false))
}

/// Ensure the database `name` is `desired`.
///
/// The name is validated as an identifier before any query runs.
pub fn reconcile<S: Session + ?Sized>(
    desired: DesiredState,
    name: &str,
    dry_run: bool,
    session: &mut S,
) -> Result<Outcome> {
    let database = Database::new(name, desired)?;
    let mut session = session;
    converge(&database, &mut session, &ApplyContext::new(dry_run))
}
