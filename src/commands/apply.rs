//! `dbconverge apply`: converge one database to the desired state

use anyhow::Result;
use converge::{DesiredState, IdentifierKind, quote_identifier};

use crate::Context;
use crate::cli::ApplyArgs;
use crate::ui;

pub fn run(ctx: &Context, args: ApplyArgs) -> Result<()> {
    let desired = DesiredState::from(args.state);

    // Reject bad names before opening a connection
    quote_identifier(&args.name, IdentifierKind::Database).map_err(converge::Error::from)?;

    let opts = ctx.connect_options(&args.connection);
    let mut session = super::open_session(&opts)?;
    log::info!(
        "Ensuring database {} is {} on {}{}",
        args.name,
        desired,
        session.target(),
        if args.check { " (check mode)" } else { "" }
    );

    let result = converge::reconcile(desired, &args.name, args.check, &mut session);
    super::close_session(session);
    let outcome = result?;

    log::debug!("Outcome: {outcome:?}");
    if args.json {
        println!("{}", serde_json::to_string(&outcome)?);
    } else {
        ui::outcome(&outcome, desired);
    }
    Ok(())
}
